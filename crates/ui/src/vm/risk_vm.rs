use services::api::{CognitiveRisk, RiskScore};

/// Colour band for a backend risk category.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiskTone {
    Low,
    Mild,
    Moderate,
    /// Anything else the backend sends, including "high" and "elevated".
    Other,
}

impl RiskTone {
    #[must_use]
    pub fn from_category(category: &str) -> Self {
        match category.trim().to_ascii_lowercase().as_str() {
            "low" => RiskTone::Low,
            "mild" => RiskTone::Mild,
            "moderate" => RiskTone::Moderate,
            _ => RiskTone::Other,
        }
    }

    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            RiskTone::Low => "risk-low",
            RiskTone::Mild => "risk-mild",
            RiskTone::Moderate => "risk-moderate",
            RiskTone::Other => "risk-other",
        }
    }

    #[must_use]
    pub fn colour(self) -> &'static str {
        match self {
            RiskTone::Low => "green",
            RiskTone::Mild => "yellow",
            RiskTone::Moderate => "orange",
            RiskTone::Other => "red",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RiskVm {
    /// e.g. "Mild Risk".
    pub label: String,
    pub tone: RiskTone,
    /// Probability as a percentage with one decimal, when known.
    pub probability_str: Option<String>,
    pub score_str: Option<String>,
    pub disclaimer: Option<String>,
}

impl RiskVm {
    fn from_parts(category: Option<&str>, probability: Option<f64>) -> Self {
        let category = category.unwrap_or("unknown");
        Self {
            label: format!("{} Risk", capitalize(category)),
            tone: RiskTone::from_category(category),
            probability_str: probability.map(|p| format!("{:.1}%", p * 100.0)),
            score_str: None,
            disclaimer: None,
        }
    }
}

impl From<&CognitiveRisk> for RiskVm {
    fn from(risk: &CognitiveRisk) -> Self {
        let mut vm = Self::from_parts(risk.category.as_deref(), risk.probability);
        vm.disclaimer = risk.disclaimer.clone();
        vm
    }
}

impl From<&RiskScore> for RiskVm {
    fn from(risk: &RiskScore) -> Self {
        let mut vm = Self::from_parts(risk.category.as_deref(), risk.probability);
        vm.score_str = risk.score.map(super::format_score);
        vm
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.trim().chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
