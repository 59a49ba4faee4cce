// Vadu API client
// Author: kelexine (https://github.com/kelexine)

mod validation;

pub use validation::{MAX_DETAILED_RECORDS, MAX_IDENTIFIERS};

use crate::auth::{Clock, CredentialCache, SystemClock};
use crate::config::{RetryConfig, SessionConfig};
use crate::error::Result;
use crate::executor::{Executor, Operation};
use crate::models::{
    AnalysisGroup, AnalysisStatus, AnalysisSummary, DetailedIdentifierSummary, IdentifierSummary,
    IntegrationData, LogFilter, PostBack, SubmitBatchRequest, SubmitBatchResponse,
    SubmitBatchWithDataRequest,
};
use crate::transport::{ReqwestTransport, Transport};
use crate::utils::retry::RetryPolicy;
use std::sync::Arc;
use tracing::{debug, info};

const GROUPS_PATH: &str = "/api-analise-bordero-config/v1/grupoanalise/cnpjcpf";
const SUBMIT_PATH: &str = "/api-analise-cnpjcpf/v1/erp/analise";
const SUBMIT_WITH_DATA_PATH: &str = "/api-analise-cnpjcpf/v2/erp/analise";
const ANALYSIS_BASE: &str = "/api-analise-cnpjcpf/v1/erp";

/// Client for the Vadu credit-analysis API.
///
/// Every endpoint goes through one [`Executor`], so all of them share the same
/// credential cache, request building and retry behavior. Cloning is cheap and
/// clones share the cached credential.
#[derive(Clone)]
pub struct VaduClient {
    executor: Executor,
    retry: RetryConfig,
}

/// Builder for [`VaduClient`]; transport and clock default to the real ones.
pub struct VaduClientBuilder {
    session: SessionConfig,
    retry: RetryConfig,
    transport: Option<Arc<dyn Transport>>,
    clock: Option<Arc<dyn Clock>>,
}

impl VaduClientBuilder {
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<VaduClient> {
        self.session.validate()?;

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let session = Arc::new(self.session);

        let credentials = CredentialCache::new(Arc::clone(&session), Arc::clone(&transport), clock);
        let executor = Executor::new(Arc::clone(&session), transport, credentials);

        debug!("Vadu client ready for {}", session.api_endpoint);
        Ok(VaduClient {
            executor,
            retry: self.retry,
        })
    }
}

impl VaduClient {
    /// Client with the production transport and default retry settings.
    pub fn new(session: SessionConfig) -> Result<Self> {
        Self::builder(session).build()
    }

    pub fn builder(session: SessionConfig) -> VaduClientBuilder {
        VaduClientBuilder {
            session,
            retry: RetryConfig::default(),
            transport: None,
            clock: None,
        }
    }

    /// Client built from a loaded [`crate::config::AppConfig`].
    pub fn from_config(config: &crate::config::AppConfig) -> Result<Self> {
        Self::builder(config.session.clone())
            .retry(config.retry.clone())
            .build()
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// A currently valid bearer token, logging in if needed.
    pub async fn token(&self) -> Result<String> {
        self.executor.credentials().get_token().await
    }

    /// Forget the cached credential.
    pub fn invalidate_token(&self) {
        self.executor.credentials().invalidate()
    }

    fn standard(&self) -> RetryPolicy {
        RetryPolicy::standard(&self.retry)
    }

    /// List the analysis groups available to this account.
    pub async fn list_analysis_groups(&self) -> Result<Vec<AnalysisGroup>> {
        let operation = Operation::get("list_analysis_groups", GROUPS_PATH)
            .with_cookie()
            .with_policy(self.standard());
        self.executor.execute(operation).await
    }

    /// Submit up to [`MAX_IDENTIFIERS`] CNPJ/CPF identifiers for analysis.
    pub async fn submit_batch(
        &self,
        cnpj_empresa: &str,
        id_grupo_analise: u64,
        identifiers: Vec<String>,
        post_back: Option<PostBack>,
    ) -> Result<SubmitBatchResponse> {
        validation::company(cnpj_empresa)?;
        validation::positive_id("analysis group id", id_grupo_analise)?;
        validation::identifiers(&identifiers)?;

        let request = SubmitBatchRequest {
            cnpj_empresa: cnpj_empresa.to_string(),
            id_grupo_analise,
            lista_cnpj_cpf: identifiers,
            post_back,
        };

        let operation = Operation::post("submit_batch", SUBMIT_PATH, &request)?
            .with_policy(self.standard());
        let response: SubmitBatchResponse = self.executor.execute(operation).await?;

        info!(
            "Batch of {} identifier(s) accepted as analysis {}",
            request.lista_cnpj_cpf.len(),
            response.analise_id
        );
        Ok(response)
    }

    /// Submit up to [`MAX_DETAILED_RECORDS`] identifiers with financial data.
    pub async fn submit_batch_with_data(
        &self,
        cnpj_empresa: &str,
        id_grupo_analise: u64,
        records: Vec<IntegrationData>,
        post_back: Option<PostBack>,
    ) -> Result<SubmitBatchResponse> {
        validation::company(cnpj_empresa)?;
        validation::positive_id("analysis group id", id_grupo_analise)?;
        validation::detailed_records(&records)?;

        let request = SubmitBatchWithDataRequest {
            cnpj_empresa: cnpj_empresa.to_string(),
            id_grupo_analise,
            lista_cnpj_cpf_dados_integracao: records,
            post_back,
        };

        let operation = Operation::post("submit_batch_with_data", SUBMIT_WITH_DATA_PATH, &request)?
            .with_policy(self.standard());
        let response: SubmitBatchResponse = self.executor.execute(operation).await?;

        info!(
            "Detailed batch of {} record(s) accepted as analysis {}",
            request.lista_cnpj_cpf_dados_integracao.len(),
            response.analise_id
        );
        Ok(response)
    }

    /// Progress of an analysis. This is the call clients poll, so it gets the
    /// larger attempt budget.
    pub async fn analysis_status(&self, analise_id: u64) -> Result<AnalysisStatus> {
        validation::positive_id("analysis id", analise_id)?;

        let path = format!("{}/status/analise/id/{}", ANALYSIS_BASE, analise_id);
        let operation = Operation::get("analysis_status", path)
            .with_policy(RetryPolicy::polling(&self.retry));
        self.executor.execute(operation).await
    }

    pub async fn analysis_summary(&self, analise_id: u64) -> Result<AnalysisSummary> {
        validation::positive_id("analysis id", analise_id)?;

        let path = format!("{}/analise/id/{}", ANALYSIS_BASE, analise_id);
        let operation = Operation::get("analysis_summary", path).with_policy(self.standard());
        self.executor.execute(operation).await
    }

    /// Per-identifier results of an analysis.
    pub async fn identifier_summaries(&self, analise_id: u64) -> Result<Vec<IdentifierSummary>> {
        validation::positive_id("analysis id", analise_id)?;

        let path = format!("{}/analise/id/{}/cnpjcpf", ANALYSIS_BASE, analise_id);
        let operation = Operation::get("identifier_summaries", path).with_policy(self.standard());
        self.executor.execute(operation).await
    }

    /// Per-identifier results with rule logs, narrowed by `filter`.
    pub async fn detailed_identifier_summaries(
        &self,
        analise_id: u64,
        filter: LogFilter,
    ) -> Result<Vec<DetailedIdentifierSummary>> {
        validation::positive_id("analysis id", analise_id)?;

        let path = format!("{}/analise/id/{}/cnpjcpf/detalhado", ANALYSIS_BASE, analise_id);
        let operation =
            Operation::get("detailed_identifier_summaries", path).with_policy(self.standard());
        let mut summaries: Vec<DetailedIdentifierSummary> =
            self.executor.execute(operation).await?;

        for summary in &mut summaries {
            filter.apply(&mut summary.logs);
        }
        Ok(summaries)
    }
}
