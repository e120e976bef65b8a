use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetModel {
    #[default]
    Veo3,
    Sora2,
}

impl fmt::Display for TargetModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetModel::Veo3 => f.write_str("Veo3"),
            TargetModel::Sora2 => f.write_str("Sora2"),
        }
    }
}

/// What the influencer does with the product on camera.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProductType {
    /// Handheld items, gadgets, cosmetics.
    #[default]
    #[serde(rename = "Physical Object", alias = "PhysicalObject")]
    PhysicalObject,
    /// Items worn by the model.
    #[serde(rename = "Fashion/Clothing", alias = "Fashion")]
    Fashion,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductType::PhysicalObject => f.write_str("Physical Object"),
            ProductType::Fashion => f.write_str("Fashion/Clothing"),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub features: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub has_price: bool,
    #[serde(default)]
    pub product_type: ProductType,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub target_model: TargetModel,
}

impl ProductInput {
    /// The price to disclose, if the flag is on and a value was typed.
    pub fn disclosed_price(&self) -> Option<&str> {
        let price = self.price.trim();
        (self.has_price && !price.is_empty()).then_some(price)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPrompt {
    pub title: String,
    /// The strict section-delimited block, `CHARACTER:` through `ENDING:`.
    pub full_prompt: String,
    pub strategy: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PromptResponse {
    pub prompts: Vec<GeneratedPrompt>,
}

/// One completed generation as handed to the UI.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PromptSet {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub prompts: Vec<GeneratedPrompt>,
}

/// Contents of the single result slot.
#[derive(Debug, Serialize, Clone, PartialEq, Default)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum GenerationState {
    #[default]
    Idle,
    Submitting,
    Success(PromptSet),
    Failed { message: String },
}

impl GenerationState {
    pub fn prompts(&self) -> &[GeneratedPrompt] {
        match self {
            GenerationState::Success(set) => &set.prompts,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            GenerationState::Failed { message } => Some(message),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn product_input_reads_form_json() {
        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "productName": "Vestido Floral",
            "features": "Viscose, estampa floral",
            "price": "R$ 89,90",
            "hasPrice": true,
            "productType": "Fashion/Clothing",
            "environment": "Praia",
            "targetModel": "Sora2"
        }))
        .unwrap();
        assert_eq!(input.product_type, ProductType::Fashion);
        assert_eq!(input.target_model, TargetModel::Sora2);
        assert_eq!(input.disclosed_price(), Some("R$ 89,90"));
    }

    #[test]
    fn product_input_defaults_optional_fields() {
        let input: ProductInput = serde_json::from_value(serde_json::json!({
            "productName": "Garrafa Térmica",
            "features": "Inox",
            "productType": "PhysicalObject",
            "environment": "Cozinha"
        }))
        .unwrap();
        assert_eq!(input.product_type, ProductType::PhysicalObject);
        assert_eq!(input.target_model, TargetModel::Veo3);
        assert!(!input.has_price);
        assert_eq!(input.disclosed_price(), None);
    }

    #[test]
    fn blank_price_is_not_disclosed_even_when_flagged() {
        let input = ProductInput {
            product_name: "Caneca".into(),
            features: "Cerâmica".into(),
            price: "   ".into(),
            has_price: true,
            product_type: ProductType::PhysicalObject,
            environment: "Escritório".into(),
            target_model: TargetModel::Veo3,
        };
        assert_eq!(input.disclosed_price(), None);
    }

    #[test]
    fn generated_prompt_uses_camel_case_wire_names() {
        let p: GeneratedPrompt = serde_json::from_str(
            r#"{"title":"Variation 1: Visual Impact","fullPrompt":"CHARACTER: ...","strategy":"Visual Impact"}"#,
        )
        .unwrap();
        assert_eq!(p.full_prompt, "CHARACTER: ...");
        let back = serde_json::to_value(&p).unwrap();
        assert!(back.get("fullPrompt").is_some());
    }

    #[test]
    fn failed_state_serializes_with_tag() {
        let state = GenerationState::Failed { message: "boom".into() };
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            serde_json::json!({"state": "failed", "message": "boom"})
        );
        assert!(state.prompts().is_empty());
        assert_eq!(state.error(), Some("boom"));
    }
}
