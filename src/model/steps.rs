//! Analysis wizard steps

/// One section of the data quality analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStep {
    Outliers,
    Disaggregates,
    GeneralPractitioners,
    NursingMidwifery,
    Validation,
}

impl AnalysisStep {
    pub fn all() -> Vec<AnalysisStep> {
        vec![
            AnalysisStep::Outliers,
            AnalysisStep::Disaggregates,
            AnalysisStep::GeneralPractitioners,
            AnalysisStep::NursingMidwifery,
            AnalysisStep::Validation,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnalysisStep::Outliers => "Outliers",
            AnalysisStep::Disaggregates => "Disaggregates",
            AnalysisStep::GeneralPractitioners => "General Practitioners",
            AnalysisStep::NursingMidwifery => "Nursing/Midwifery",
            AnalysisStep::Validation => "Validation",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            AnalysisStep::Outliers => "Values far outside the expected range for each country",
            AnalysisStep::Disaggregates => "Totals that do not match the sum of their disaggregations",
            AnalysisStep::GeneralPractitioners => "Consistency of general practitioner stock figures",
            AnalysisStep::NursingMidwifery => "Consistency of nursing and midwifery personnel figures",
            AnalysisStep::Validation => "Validation rule violations for the selected countries",
        }
    }

    /// Step whose name matches `code`, ignoring case
    pub fn from_section_name(code: &str) -> Option<AnalysisStep> {
        let code = code.to_lowercase();
        Self::all()
            .into_iter()
            .find(|step| step.name().to_lowercase() == code)
    }
}
