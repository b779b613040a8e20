use crate::store::AnalysisResult;

#[derive(Debug, Clone)]
pub enum AppEvent {
    AnalysisReady {
        generation: u64,
        error_id: u32,
        analysis: Option<AnalysisResult>,
    },
    DatasetWarning(String),
}
