//! Admin index: the record-kind registry and its configured ordering.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::identity::{AuthError, Role};
use crate::portal::Portal;

pub const SITE_HEADER: &str = "JobWorks Administration";
pub const INDEX_TITLE: &str = "Welcome to JobWorks Administration";

const UNRANKED: u32 = u32::MAX;

/// One admin index section and the record kinds it manages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminSection {
    pub label: String,
    pub title: String,
    pub models: Vec<String>,
}

/// Explicit ordering tables for the admin index.
///
/// Ranks live in plain maps passed to [`ordered_sections`]; anything
/// unranked sorts after everything ranked without disturbing its relative
/// order.
#[derive(Debug, Clone, Default)]
pub struct SectionOrdering {
    pub sections: BTreeMap<String, u32>,
    pub models: BTreeMap<String, BTreeMap<String, u32>>,
}

impl SectionOrdering {
    fn section_rank(&self, label: &str) -> u32 {
        self.sections.get(label).copied().unwrap_or(UNRANKED)
    }

    fn model_rank(&self, label: &str, model: &str) -> u32 {
        self.models
            .get(label)
            .and_then(|ranks| ranks.get(model))
            .copied()
            .unwrap_or(UNRANKED)
    }
}

/// Sorts sections and the models inside each by the configured ranks.
/// Stable: ties and unranked entries keep their registry order.
pub fn ordered_sections(
    mut sections: Vec<AdminSection>,
    ordering: &SectionOrdering,
) -> Vec<AdminSection> {
    for section in &mut sections {
        let label = section.label.clone();
        section
            .models
            .sort_by_key(|model| ordering.model_rank(&label, model));
    }
    sections.sort_by_key(|section| ordering.section_rank(&section.label));
    sections
}

/// Every record kind the portal stores, grouped by area. Sections and
/// models are listed alphabetically; presentation order comes from an
/// ordering table.
pub fn registry() -> Vec<AdminSection> {
    vec![
        AdminSection {
            label: "applications".to_string(),
            title: "Applications".to_string(),
            models: vec!["Application".to_string()],
        },
        AdminSection {
            label: "catalog".to_string(),
            title: "Job Catalog".to_string(),
            models: vec![
                "Company".to_string(),
                "Job".to_string(),
                "Saved job".to_string(),
            ],
        },
        AdminSection {
            label: "identity".to_string(),
            title: "Identity".to_string(),
            models: vec![
                "Employer profile".to_string(),
                "Identity".to_string(),
                "Job seeker profile".to_string(),
            ],
        },
        AdminSection {
            label: "notifications".to_string(),
            title: "Notifications".to_string(),
            models: vec!["Notification".to_string()],
        },
    ]
}

/// Accounts first, then the catalog, then what flows through it.
pub fn default_ordering() -> SectionOrdering {
    let mut sections = BTreeMap::new();
    sections.insert("identity".to_string(), 1);
    sections.insert("catalog".to_string(), 2);
    sections.insert("applications".to_string(), 3);
    sections.insert("notifications".to_string(), 4);

    let mut identity_models = BTreeMap::new();
    identity_models.insert("Identity".to_string(), 1);
    identity_models.insert("Job seeker profile".to_string(), 2);
    identity_models.insert("Employer profile".to_string(), 3);

    let mut catalog_models = BTreeMap::new();
    catalog_models.insert("Company".to_string(), 1);
    catalog_models.insert("Job".to_string(), 2);
    catalog_models.insert("Saved job".to_string(), 3);

    let mut models = BTreeMap::new();
    models.insert("identity".to_string(), identity_models);
    models.insert("catalog".to_string(), catalog_models);

    SectionOrdering { sections, models }
}

#[derive(Debug, Serialize)]
pub struct AdminSiteView {
    pub site_header: &'static str,
    pub index_title: &'static str,
    pub sections: Vec<AdminSection>,
}

pub(crate) fn routes() -> Router<Arc<Portal>> {
    Router::new().route("/api/v1/admin/site", get(site))
}

async fn site(
    State(portal): State<Arc<Portal>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, AuthError> {
    portal.guard.require(&headers, Role::Admin)?;
    Ok(Json(AdminSiteView {
        site_header: SITE_HEADER,
        index_title: INDEX_TITLE,
        sections: ordered_sections(registry(), &portal.admin_ordering),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(label: &str, models: &[&str]) -> AdminSection {
        AdminSection {
            label: label.to_string(),
            title: label.to_string(),
            models: models.iter().map(|model| model.to_string()).collect(),
        }
    }

    #[test]
    fn ranked_sections_come_first_unranked_keep_registry_order() {
        let mut ordering = SectionOrdering::default();
        ordering.sections.insert("gamma".to_string(), 1);

        let sections = vec![
            section("alpha", &[]),
            section("beta", &[]),
            section("gamma", &[]),
        ];
        let labels: Vec<String> = ordered_sections(sections, &ordering)
            .into_iter()
            .map(|section| section.label)
            .collect();
        assert_eq!(labels, vec!["gamma", "alpha", "beta"]);
    }

    #[test]
    fn models_are_sorted_within_their_own_section_only() {
        let mut ordering = SectionOrdering::default();
        let mut ranks = BTreeMap::new();
        ranks.insert("Second".to_string(), 2);
        ranks.insert("First".to_string(), 1);
        ordering.models.insert("ranked".to_string(), ranks);

        let sections = vec![
            section("ranked", &["Second", "First", "Extra"]),
            section("untouched", &["Zeta", "Alpha"]),
        ];
        let sorted = ordered_sections(sections, &ordering);
        assert_eq!(sorted[0].models, vec!["First", "Second", "Extra"]);
        assert_eq!(sorted[1].models, vec!["Zeta", "Alpha"]);
    }

    #[test]
    fn default_ordering_puts_identity_before_the_catalog() {
        let sections = ordered_sections(registry(), &default_ordering());
        let labels: Vec<&str> = sections
            .iter()
            .map(|section| section.label.as_str())
            .collect();
        assert_eq!(
            labels,
            vec!["identity", "catalog", "applications", "notifications"]
        );
        assert_eq!(
            sections[0].models,
            vec!["Identity", "Job seeker profile", "Employer profile"]
        );
        assert_eq!(sections[1].models, vec!["Company", "Job", "Saved job"]);
    }
}
