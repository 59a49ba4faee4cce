//! Vadu analysis API wire formats.
//!
//! Field names follow the JSON the service speaks; most endpoints use
//! `snake_case`, the detailed-data submission uses `camelCase`.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Read JSON `null` as the type's default, the way the service's own clients do.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A named ruleset under which batches are evaluated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisGroup {
    pub id_grupo_analise: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub nome_grupo_analise: String,
    pub rating_start: i64,
    pub rating_minimo: i64,
    pub rating_maximo: i64,
    pub quantidade_analises: u64,
    pub quantidade_regras: u64,
    pub quantidade_validacoes: u64,
}

/// Optional webhook the service calls when the analysis finishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostBack {
    pub url: String,
    pub token: String,
    #[serde(rename = "tipoDadosRetorno")]
    pub tipo_dados_retorno: i32,
}

/// Batch of plain CNPJ/CPF identifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitBatchRequest {
    pub cnpj_empresa: String,
    pub id_grupo_analise: u64,
    pub lista_cnpj_cpf: Vec<String>,
    #[serde(rename = "postBack", skip_serializing_if = "Option::is_none", default)]
    pub post_back: Option<PostBack>,
}

/// Batch of identifiers with financial data attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitBatchWithDataRequest {
    pub cnpj_empresa: String,
    pub id_grupo_analise: u64,
    pub lista_cnpj_cpf_dados_integracao: Vec<IntegrationData>,
    #[serde(rename = "postBack", skip_serializing_if = "Option::is_none", default)]
    pub post_back: Option<PostBack>,
}

/// Acknowledgement of a submitted batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitBatchResponse {
    pub analise_id: u64,
    #[serde(default)]
    pub quantidade_cnpj: u64,
    #[serde(default)]
    pub quantidade_cpf: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub usuario: String,
    pub data_hora_envio: DateTime<Utc>,
    #[serde(default)]
    pub id_grupo_analise: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nome_lote: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub nome_grupo_analise: String,
}

/// Financial data for one identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntegrationData {
    pub cnpjcpf: String,
    pub ativo_total: f64,
    pub ativo_circulante: f64,
    pub ativo_nao_circulante: f64,
    pub ativo_realizavel_longo_prazo: f64,
    pub deducao_receita_bruta: f64,
    pub depreciacao_bens: f64,
    pub despesas: f64,
    pub disponivel_caixa: f64,
    pub emprestimo: f64,
    pub estoque_balanco: f64,
    pub lucro_liquido: f64,
    pub passivo_circulante: f64,
    pub passivo_nao_circulante: f64,
    pub passivo_total: f64,
    pub patrimonio_liquido: f64,
    pub receita_liquida: f64,
    pub receita_bruta: f64,
    pub vendas_liquidas: f64,
    pub score_externo: i64,
    pub probabilidade_inadimplencia: i64,
    pub dividas_baixas_prejuizo: f64,
    pub quantidade_instituicoes: i64,
    #[serde(rename = "limiteCreditoVencimentoAte360Dias")]
    pub limite_credito_vencimento_ate_360: f64,
    pub creditos_vencer_ate30_dias: f64,
    pub falencia: i64,
    pub cheque_sem_fundos: i64,
    pub faturamento_medio_mensal: f64,
    #[serde(rename = "capitalGiroSCR")]
    pub capital_giro_scr: f64,
    pub capital_giro_liquido: f64,
    pub capital_giro_proprio: f64,
    pub necessidade_capital_giro: f64,
    pub liquidez_corrente: f64,
    pub liquidez_seca: f64,
    pub liquidez_geral: f64,
    pub liquidez_imediata: f64,
    pub grau_solvencia: f64,
    pub endividamento: f64,
    // The service spells this one without the second "n".
    #[serde(rename = "dependeciaRecursosTerceiros")]
    pub dependencia_recursos_terceiros: f64,
    pub endividamento_curto_prazo: f64,
    pub nivel_imobilizacao: f64,
    pub grau_dependencia_bancaria: f64,
    #[serde(rename = "retornoPatrimonioLiquidoROE")]
    pub retorno_patrimonio_liquido_roe: f64,
    pub giro_ativo: f64,
    #[serde(rename = "retornoSobreAtivoRAO")]
    pub retorno_sobre_ativo_rao: f64,
    pub retorno_sobre_vendas: f64,
    pub margem_operacional: f64,
    pub rating_externo: String,
}

/// Progress of an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisStatus {
    #[serde(rename = "quantidade_cnpj_cpf")]
    pub quantidade_cnpjs_cpfs: u64,
    pub quantidade_consultas_receita: u64,
    pub percentual_consultas_receita: u32,
    #[serde(rename = "quantidade_cnpj_cpf_concluidos")]
    pub quantidade_cnpjs_cpfs_concluidos: u64,
    pub percentual_concluido: u32,
    pub finalizando_arquivo: bool,
    pub concluido: bool,
}

/// Aggregate result of an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSummary {
    pub analise_id: u64,
    pub quantidade_cnpj: u64,
    pub quantidade_cpf: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub cnpj_empresa: String,
    #[serde(deserialize_with = "null_as_default")]
    pub usuario: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data_hora_envio: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data_hora_conclusao: String,
    pub concluido: bool,
    pub erro: bool,
    pub alerta: bool,
    pub bloqueio: bool,
    pub quantidade_cnpj_alerta: u64,
    pub quantidade_cnpj_bloqueio: u64,
    pub quantidade_cpf_alerta: u64,
    pub quantidade_cpf_bloqueio: u64,
    pub id_grupo_analise: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub nome_grupo_analise: String,
    pub rating_valor: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_sigla: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_descricao: String,
    pub rating2_valor: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating2_sigla: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rating2_descricao: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nome_lote: String,
}

/// Result for one identifier inside an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentifierSummary {
    pub analise_id: u64,
    pub analise_cnpj_cpf_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub cnpj_cpf: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nome: String,
    pub erro: bool,
    pub alerta: bool,
    pub bloqueio: bool,
    pub rating: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_sigla: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_descricao: String,
    pub rating2: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating2_sigla: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rating2_descricao: String,
    pub nova_consulta_serasa: bool,
    #[serde(rename = "nova_consulta_serasa_string_retorno")]
    pub nova_consulta_serasa_retorno: Option<String>,
    #[serde(rename = "flowSolicitacao_id")]
    pub flow_solicitacao_id: u64,
    #[serde(rename = "flowTarefaNome", deserialize_with = "null_as_default")]
    pub flow_tarefa_nome: String,
    #[serde(rename = "flowTarefa_id")]
    pub flow_tarefa_id: u64,
    pub origem_consulta_serasa: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub origem_consulta_serasa_texto: String,
}

/// One rule evaluation recorded for an identifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisLog {
    #[serde(deserialize_with = "null_as_default")]
    pub analise_descricao: String,
    #[serde(deserialize_with = "null_as_default")]
    pub regra_descricao: String,
    #[serde(deserialize_with = "null_as_default")]
    pub regra_condicao: String,
    pub erro: bool,
    pub alerta: bool,
    pub liberado: bool,
    pub transferido: bool,
    #[serde(rename = "erroConsulta")]
    pub erro_consulta: Option<bool>,
    pub bloqueio: bool,
}

impl AnalysisLog {
    /// Whether the rule raised an error, an alert or a block.
    pub fn is_flagged(&self) -> bool {
        self.erro || self.alerta || self.bloqueio
    }
}

/// [`IdentifierSummary`] plus the rule logs behind the rating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailedIdentifierSummary {
    pub analise_id: u64,
    pub analise_cnpj_cpf_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub cnpj_cpf: String,
    #[serde(deserialize_with = "null_as_default")]
    pub nome: String,
    pub erro: bool,
    pub alerta: bool,
    pub bloqueio: bool,
    pub rating: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_sigla: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rating_descricao: String,
    pub rating2: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub rating2_sigla: String,
    #[serde(deserialize_with = "null_as_default")]
    pub rating2_descricao: String,
    pub nova_consulta_serasa: bool,
    #[serde(rename = "nova_consulta_serasa_string_retorno")]
    pub nova_consulta_serasa_retorno: Option<String>,
    #[serde(rename = "flowSolicitacao_id")]
    pub flow_solicitacao_id: u64,
    #[serde(rename = "flowTarefaNome", deserialize_with = "null_as_default")]
    pub flow_tarefa_nome: String,
    #[serde(rename = "flowTarefa_id")]
    pub flow_tarefa_id: u64,
    pub origem_consulta_serasa: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub origem_consulta_serasa_texto: String,
    #[serde(deserialize_with = "null_as_default")]
    pub logs: Vec<AnalysisLog>,
}

/// Which rule logs to keep in detailed summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFilter {
    /// Every log the service returned.
    All,
    /// Only logs with `erro`, `alerta` or `bloqueio` set.
    #[default]
    Flagged,
}

impl LogFilter {
    pub fn apply(self, logs: &mut Vec<AnalysisLog>) {
        if self == LogFilter::Flagged {
            logs.retain(AnalysisLog::is_flagged);
        }
    }
}
