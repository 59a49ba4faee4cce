// Shared helpers for integration tests
// Author: kelexine (https://github.com/kelexine)

#![allow(dead_code)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use vadu::{
    Clock, CredentialCache, HttpRequest, HttpResponse, ManualClock, RetryConfig, SessionConfig,
    Transport, TransportError, VaduClient,
};

pub const API_URL: &str = "http://vadu.test";
pub const LOGIN_URL: &str = "http://vadu.test/vadu.dll/Autenticacao/JSONPegarToken";
pub const CLIENT_IDENTITY: &str = "client-identity-secret";
pub const COOKIE: &str = "ASP.NET_SessionId=abc123";

type LoginHandler = dyn Fn(usize) -> Result<HttpResponse, TransportError> + Send + Sync;
type ApiHandler = dyn Fn(&HttpRequest, usize) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Scripted transport. Login requests (by URL) and API requests are answered
/// by separate handlers, which receive the 1-based call number.
pub struct StubTransport {
    login: Box<LoginHandler>,
    api: Box<ApiHandler>,
    login_delay: Duration,
    login_calls: AtomicUsize,
    api_calls: AtomicUsize,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubTransport {
    /// Login hands out `token-N`; every API call answers 200 with `{}`.
    pub fn new() -> Self {
        Self {
            login: Box::new(|n| Ok(token_response(&format!("token-{}", n)))),
            api: Box::new(|_, _| Ok(HttpResponse::new(200, "{}"))),
            login_delay: Duration::ZERO,
            login_calls: AtomicUsize::new(0),
            api_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_login<F>(mut self, handler: F) -> Self
    where
        F: Fn(usize) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        self.login = Box::new(handler);
        self
    }

    pub fn with_api<F>(mut self, handler: F) -> Self
    where
        F: Fn(&HttpRequest, usize) -> Result<HttpResponse, TransportError> + Send + Sync + 'static,
    {
        self.api = Box::new(handler);
        self
    }

    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn api_calls(&self) -> usize {
        self.api_calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub fn api_requests(&self) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.url != LOGIN_URL)
            .collect()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());

        if request.url == LOGIN_URL {
            let n = self.login_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if !self.login_delay.is_zero() {
                tokio::time::sleep(self.login_delay).await;
            }
            return (self.login)(n);
        }

        let n = self.api_calls.fetch_add(1, Ordering::SeqCst) + 1;
        (self.api)(&request, n)
    }
}

pub fn token_response(token: &str) -> HttpResponse {
    HttpResponse::new(200, format!(r#"{{"token":"{}"}}"#, token))
}

pub fn session() -> SessionConfig {
    SessionConfig::new(CLIENT_IDENTITY, COOKIE)
        .with_api_endpoint(API_URL)
        .with_login_endpoint(LOGIN_URL)
}

/// Default attempt budgets with millisecond delays.
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        initial_backoff_ms: 1,
        max_backoff_ms: 5,
        ..RetryConfig::default()
    }
}

pub fn cache(stub: &Arc<StubTransport>, clock: &Arc<ManualClock>) -> CredentialCache {
    let transport: Arc<dyn Transport> = stub.clone();
    let clock: Arc<dyn Clock> = clock.clone();
    CredentialCache::new(Arc::new(session()), transport, clock)
}

pub fn client(stub: &Arc<StubTransport>) -> VaduClient {
    let transport: Arc<dyn Transport> = stub.clone();
    VaduClient::builder(session())
        .retry(fast_retry())
        .transport(transport)
        .clock(Arc::new(ManualClock::default()))
        .build()
        .expect("client builds with a stub transport")
}

// Fixtures captured from the production API.

pub const GROUPS_FIXTURE: &str = r#"[
    {
        "id_grupo_analise": 10802,
        "nome_grupo_analise": "Análises CNPJs",
        "rating_start": 1000,
        "rating_minimo": -15650,
        "rating_maximo": 0,
        "quantidade_analises": 1,
        "quantidade_regras": 28,
        "quantidade_validacoes": 79
    }
]"#;

pub const SUBMIT_FIXTURE: &str = r#"{
    "analise_id": 4768906,
    "quantidade_cnpj": 1,
    "quantidade_cpf": 0,
    "usuario": "Contbank - Usuário p/Integração Não excluir",
    "data_hora_envio": "2024-11-25T18:28:44.523Z",
    "id_grupo_analise": 10802,
    "nome_lote": "",
    "nome_grupo_analise": "Análises CNPJs"
}"#;

pub const STATUS_FIXTURE: &str = r#"{
    "quantidade_cnpj_cpf": 1,
    "quantidade_consultas_receita": 0,
    "percentual_consultas_receita": 0,
    "quantidade_cnpj_cpf_concluidos": 1,
    "percentual_concluido": 100,
    "finalizando_arquivo": false,
    "concluido": true
}"#;

pub const SUMMARY_FIXTURE: &str = r#"{
    "analise_id": 4768906,
    "quantidade_cnpj": 1,
    "quantidade_cpf": 0,
    "cnpj_empresa": "33011770000199",
    "usuario": "Contbank - Usuário p/Integração Não excluir",
    "data_hora_envio": "2024-11-25T18:28:44.523Z",
    "data_hora_conclusao": "2024-11-25T18:28:50.483Z",
    "concluido": true,
    "erro": false,
    "alerta": true,
    "bloqueio": false,
    "quantidade_cnpj_alerta": 1,
    "quantidade_cnpj_bloqueio": 0,
    "quantidade_cpf_alerta": 0,
    "quantidade_cpf_bloqueio": 0,
    "id_grupo_analise": 10802,
    "nome_grupo_analise": "Análises CNPJs",
    "rating_valor": 500,
    "rating_sigla": "B (500)",
    "rating_descricao": "CCB--> 40% do faturamento mensal || ANT--> 20% do faturamento mensal",
    "rating2_valor": 0,
    "rating2_sigla": "Fora de faixa: 0",
    "rating2_descricao": "Rating fora de faixa",
    "nome_lote": ""
}"#;

pub const IDENTIFIER_SUMMARIES_FIXTURE: &str = r#"[
    {
        "analise_id": 4768906,
        "analise_cnpj_cpf_id": 28883956,
        "cnpj_cpf": "98960887000164",
        "nome": "WEBSOLUTIONS LTDA",
        "erro": false,
        "alerta": true,
        "bloqueio": false,
        "rating": 500,
        "rating_sigla": "B (500)",
        "rating_descricao": "CCB--> 40% do faturamento mensal || ANT--> 20% do faturamento mensal",
        "rating2": 0,
        "rating2_sigla": "Fora de faixa: 0",
        "rating2_descricao": "",
        "nova_consulta_serasa": false,
        "nova_consulta_serasa_string_retorno": "",
        "flowSolicitacao_id": 0,
        "flowTarefaNome": "",
        "flowTarefa_id": 0,
        "origem_consulta_serasa": 0,
        "origem_consulta_serasa_texto": "Consulta Serasa"
    }
]"#;

pub const DETAILED_FIXTURE: &str = r#"[
    {
        "analise_id": 4768906,
        "analise_cnpj_cpf_id": 28883956,
        "cnpj_cpf": "37697591000108",
        "nome": "WEBTECH SOLUTIONS CONSULTORIA E INFORMATICA LTDA",
        "erro": false,
        "alerta": true,
        "bloqueio": false,
        "rating": 500,
        "rating_sigla": "B (500)",
        "rating_descricao": "CCB--> 40% do faturamento mensal || ANT--> 20% do faturamento mensal",
        "rating2": 0,
        "rating2_sigla": "Fora de faixa: 0",
        "rating2_descricao": "",
        "nova_consulta_serasa": false,
        "nova_consulta_serasa_string_retorno": null,
        "logs": [
            {
                "analise_descricao": "Análise CNPJs",
                "regra_descricao": "Cadastro 13 - Análise Sócios - 03",
                "regra_condicao": " SÓCIOS.Homônimo com mesma data de nascimento IGUAL true ",
                "erro": false,
                "alerta": false,
                "liberado": false,
                "transferido": false,
                "erroConsulta": null,
                "bloqueio": false
            },
            {
                "analise_descricao": "Análise CNPJs",
                "regra_descricao": "Cadastro 14 - Análise Sócios - 03",
                "regra_condicao": " SÓCIOS.Homônimo com mesmo nome da mãe IGUAL true ",
                "erro": true,
                "alerta": false,
                "liberado": false,
                "transferido": false,
                "erroConsulta": null,
                "bloqueio": false
            }
        ]
    }
]"#;
