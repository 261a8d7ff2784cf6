mod client;
mod components;
mod health_check;
mod inoculation;
mod qc;
mod qc_register;
mod time_study;
