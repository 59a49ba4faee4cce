// Data models for the Vadu API
// Author: kelexine (https://github.com/kelexine)

pub mod analysis;

pub use analysis::{
    AnalysisGroup, AnalysisLog, AnalysisStatus, AnalysisSummary, DetailedIdentifierSummary,
    IdentifierSummary, IntegrationData, LogFilter, PostBack, SubmitBatchRequest,
    SubmitBatchResponse, SubmitBatchWithDataRequest,
};
