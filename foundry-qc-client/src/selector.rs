// Copyright 2024 Foundry QC developers
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.

use crate::store::ComponentDirectory;
use crate::ClientError;
use foundry_qc::constants::SEARCH_LIMIT;
use foundry_qc::domain::Component;

/// Searches the reference list and keeps track of the component in production.
pub struct ComponentSelector<D> {
    directory: D,
    active: Option<Component>,
}

impl<D: ComponentDirectory> ComponentSelector<D> {
    pub fn new(directory: D) -> Self {
        ComponentSelector {
            directory,
            active: None,
        }
    }

    /// At most ten components matching `query`. A blank query matches nothing and does not
    /// reach the directory.
    #[tracing::instrument(name = "Searching for a component", skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<Component>, ClientError> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }
        let mut found = self.directory.search(query.trim()).await?;
        found.truncate(SEARCH_LIMIT as usize);
        Ok(found)
    }

    /// Makes `component` the active one and marks it as used.
    ///
    /// Touching is a side effect: an unknown code or a failed touch is logged, the selection
    /// happens regardless.
    #[tracing::instrument(name = "Selecting a component", skip(self, component), fields(code = %component.code))]
    pub async fn select(&mut self, component: Component) -> &Component {
        match self.directory.touch(&component.code).await {
            Ok(true) => {}
            Ok(false) => tracing::debug!("Selected component is not in the reference list"),
            Err(e) => tracing::warn!(error = %e, "Failed to update last use of component"),
        }
        self.active.insert(component)
    }

    pub fn active(&self) -> Option<&Component> {
        self.active.as_ref()
    }
}
