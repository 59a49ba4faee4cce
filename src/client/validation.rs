// Caller-side payload checks, run before anything touches the network
// Author: kelexine (https://github.com/kelexine)

use crate::error::{VaduError, Result};
use crate::models::IntegrationData;

/// Most plain identifiers accepted in one submission.
pub const MAX_IDENTIFIERS: usize = 2000;

/// Most detailed-data records accepted in one submission.
pub const MAX_DETAILED_RECORDS: usize = 100;

pub(crate) fn company(cnpj_empresa: &str) -> Result<()> {
    if cnpj_empresa.trim().is_empty() {
        return Err(VaduError::Validation("cnpj_empresa must not be empty".to_string()));
    }
    Ok(())
}

pub(crate) fn positive_id(what: &str, id: u64) -> Result<()> {
    if id == 0 {
        return Err(VaduError::Validation(format!("{} must be positive", what)));
    }
    Ok(())
}

pub(crate) fn identifiers(identifiers: &[String]) -> Result<()> {
    if identifiers.is_empty() {
        return Err(VaduError::Validation("identifier list is empty".to_string()));
    }
    if identifiers.len() > MAX_IDENTIFIERS {
        return Err(VaduError::Validation(format!(
            "{} identifiers exceed the limit of {} per submission",
            identifiers.len(),
            MAX_IDENTIFIERS
        )));
    }
    if let Some(position) = identifiers.iter().position(|id| id.trim().is_empty()) {
        return Err(VaduError::Validation(format!(
            "identifier at position {} is blank",
            position
        )));
    }
    Ok(())
}

pub(crate) fn detailed_records(records: &[IntegrationData]) -> Result<()> {
    if records.is_empty() {
        return Err(VaduError::Validation("record list is empty".to_string()));
    }
    if records.len() > MAX_DETAILED_RECORDS {
        return Err(VaduError::Validation(format!(
            "{} records exceed the limit of {} per submission",
            records.len(),
            MAX_DETAILED_RECORDS
        )));
    }
    if let Some(position) = records.iter().position(|r| r.cnpjcpf.trim().is_empty()) {
        return Err(VaduError::Validation(format!(
            "record at position {} has a blank cnpjcpf",
            position
        )));
    }
    Ok(())
}
