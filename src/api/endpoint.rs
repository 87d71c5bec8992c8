// SPDX-License-Identifier: MPL-2.0
//! View endpoints of the planning server.
//!
//! Both endpoint families return a server-rendered PNG for one camera
//! position. They differ in path, accepted view names, and the positioning
//! renderer's extra `width`/`height` query parameters.

use crate::config::{DEFAULT_POSITIONING_HEIGHT, DEFAULT_POSITIONING_WIDTH};
use crate::fetch::PlanId;
use reqwest::Url;
use std::fmt;

/// Camera position understood by the renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewName {
    Front,
    Back,
    LeftSide,
    RightSide,
    Side,
    OtherSide,
    Top,
    Bottom,
}

impl ViewName {
    /// Value sent in the `view_name` query parameter.
    #[must_use]
    pub fn as_query(self) -> &'static str {
        match self {
            ViewName::Front => "front",
            ViewName::Back => "back",
            ViewName::LeftSide => "left_side",
            ViewName::RightSide => "right_side",
            ViewName::Side => "side",
            ViewName::OtherSide => "other side",
            ViewName::Top => "top",
            ViewName::Bottom => "bottom",
        }
    }

    /// Button label: underscores become spaces, words are capitalized.
    #[must_use]
    pub fn label(self) -> String {
        self.as_query()
            .split(['_', ' '])
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for ViewName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

const MODEL_VIEWS: [ViewName; 6] = [
    ViewName::Front,
    ViewName::Back,
    ViewName::LeftSide,
    ViewName::RightSide,
    ViewName::Top,
    ViewName::Bottom,
];

const POSITIONING_VIEWS: [ViewName; 6] = [
    ViewName::Front,
    ViewName::Back,
    ViewName::Side,
    ViewName::OtherSide,
    ViewName::Top,
    ViewName::Bottom,
];

/// Endpoint family a viewer is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEndpoint {
    /// Operation plan scene (bone plus assigned prosthesis).
    OperationPlanModel,
    /// Pre-operative bone positioning with registration points.
    BonePositioning { width: u32, height: u32 },
}

impl ViewEndpoint {
    /// Positioning endpoint with the renderer's default size.
    #[must_use]
    pub fn bone_positioning() -> Self {
        ViewEndpoint::BonePositioning {
            width: DEFAULT_POSITIONING_WIDTH,
            height: DEFAULT_POSITIONING_HEIGHT,
        }
    }

    /// Path relative to the server base URL.
    #[must_use]
    pub fn path(&self) -> &'static str {
        match self {
            ViewEndpoint::OperationPlanModel => "operation_plan_models/get_view",
            ViewEndpoint::BonePositioning { .. } => "preop_bone_positioning/get_view",
        }
    }

    /// View names offered for this endpoint, in display order.
    #[must_use]
    pub fn views(&self) -> &'static [ViewName] {
        match self {
            ViewEndpoint::OperationPlanModel => &MODEL_VIEWS,
            ViewEndpoint::BonePositioning { .. } => &POSITIONING_VIEWS,
        }
    }

    #[must_use]
    pub fn supports(&self, view: ViewName) -> bool {
        self.views().contains(&view)
    }

    /// Query parameters for one request, in the order the server documents.
    #[must_use]
    pub fn query(&self, plan_id: PlanId, view: ViewName) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("i_operation_plan", plan_id.to_string()),
            ("view_name", view.as_query().to_string()),
        ];
        if let ViewEndpoint::BonePositioning { width, height } = self {
            params.push(("width", width.to_string()));
            params.push(("height", height.to_string()));
        }
        params
    }

    /// Full request URL against `base`, which must end with `/`.
    ///
    /// # Errors
    ///
    /// Returns the parser error when the joined URL is invalid.
    pub fn url(&self, base: &Url, plan_id: PlanId, view: ViewName) -> Result<Url, String> {
        let mut url = base.join(self.path()).map_err(|e| e.to_string())?;
        url.query_pairs_mut()
            .extend_pairs(self.query(plan_id, view));
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("http://127.0.0.1:8000/").expect("valid base")
    }

    fn plan(id: i64) -> PlanId {
        PlanId::parse(&id.to_string()).expect("numeric id")
    }

    #[test]
    fn model_url_has_plan_and_view() {
        let url = ViewEndpoint::OperationPlanModel
            .url(&base(), plan(42), ViewName::LeftSide)
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/operation_plan_models/get_view?i_operation_plan=42&view_name=left_side"
        );
    }

    #[test]
    fn positioning_url_adds_fixed_size() {
        let url = ViewEndpoint::bone_positioning()
            .url(&base(), plan(7), ViewName::Front)
            .expect("url");
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/preop_bone_positioning/get_view?i_operation_plan=7&view_name=front&width=1200&height=800"
        );
    }

    #[test]
    fn view_name_with_space_round_trips_through_query() {
        let url = ViewEndpoint::bone_positioning()
            .url(&base(), plan(7), ViewName::OtherSide)
            .expect("url");
        let view = url
            .query_pairs()
            .find(|(k, _)| k == "view_name")
            .map(|(_, v)| v.into_owned());
        assert_eq!(view.as_deref(), Some("other side"));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let base = Url::parse("http://host/api/").expect("valid base");
        let url = ViewEndpoint::OperationPlanModel
            .url(&base, plan(1), ViewName::Top)
            .expect("url");
        assert!(url.as_str().starts_with("http://host/api/operation_plan_models/get_view?"));
    }

    #[test]
    fn endpoints_expose_their_view_sets() {
        let model = ViewEndpoint::OperationPlanModel;
        let positioning = ViewEndpoint::bone_positioning();

        assert!(model.supports(ViewName::LeftSide));
        assert!(!model.supports(ViewName::OtherSide));
        assert!(positioning.supports(ViewName::OtherSide));
        assert!(!positioning.supports(ViewName::RightSide));
        assert_eq!(model.views().len(), 6);
        assert_eq!(positioning.views()[0], ViewName::Front);
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(ViewName::LeftSide.label(), "Left Side");
        assert_eq!(ViewName::OtherSide.label(), "Other Side");
        assert_eq!(ViewName::Top.label(), "Top");
    }
}
