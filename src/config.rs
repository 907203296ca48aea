//! Configuração do rollcall carregada a partir de `rollcall.toml`.
//!
//! A struct [`ScraperConfig`] contém todos os parâmetros configuráveis.
//! Valores não presentes no arquivo usam defaults sensíveis.
//! A variável de ambiente `ROLLCALL_INDEX_URL_TEMPLATE` tem precedência sobre o arquivo.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ScrapeError;
use crate::journal::{Chamber, DEFAULT_DATE_PATTERN, DEFAULT_HEADER_PATTERN, Patterns};

/// Nome do arquivo de configuração procurado no diretório atual.
pub const CONFIG_FILE: &str = "rollcall.toml";

/// Variável de ambiente que substitui `index_url_template`.
pub const INDEX_URL_ENV: &str = "ROLLCALL_INDEX_URL_TEMPLATE";

/// Configuração de nível superior carregada de `rollcall.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// URL da página índice dos diários. Aceita `{session_slug}` e `{chamber}`
    /// (`house` ou `senate`).
    #[serde(default = "default_index_url_template")]
    pub index_url_template: String,

    /// Identificador da sessão legislativa → slug usado na URL.
    #[serde(default = "default_sessions")]
    pub sessions: BTreeMap<String, String>,

    /// Trecho que um link da página índice precisa conter para ser um diário.
    #[serde(default = "default_document_link_filter")]
    pub document_link_filter: String,

    /// Regex do cabeçalho de página do diário.
    #[serde(default = "default_header_pattern")]
    pub header_pattern: String,

    /// Regex da linha de data do diário.
    #[serde(default = "default_date_pattern")]
    pub date_pattern: String,

    /// Timeout de conexão HTTP em segundos.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Timeout total de cada requisição HTTP em segundos.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_index_url_template() -> String {
    "http://www.legis.nd.gov/assembly/{session_slug}/journals/{chamber}-journal.html".to_string()
}

fn default_sessions() -> BTreeMap<String, String> {
    [("62", "62-2011"), ("63", "63-2013"), ("64", "64-2015")]
        .into_iter()
        .map(|(id, slug)| (id.to_string(), slug.to_string()))
        .collect()
}

fn default_document_link_filter() -> String {
    ".pdf".to_string()
}

fn default_header_pattern() -> String {
    DEFAULT_HEADER_PATTERN.to_string()
}

fn default_date_pattern() -> String {
    DEFAULT_DATE_PATTERN.to_string()
}

// Valor padrão para o timeout de conexão: 10s.
fn default_connect_timeout_secs() -> u64 {
    10
}

// Valor padrão para o timeout de requisição: 120s.
fn default_timeout_secs() -> u64 {
    120
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            index_url_template: default_index_url_template(),
            sessions: default_sessions(),
            document_link_filter: default_document_link_filter(),
            header_pattern: default_header_pattern(),
            date_pattern: default_date_pattern(),
            connect_timeout_secs: default_connect_timeout_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ScraperConfig {
    /// Carrega a configuração de `rollcall.toml` no diretório atual.
    /// Usa valores padrão se o arquivo não existir.
    pub fn load() -> Result<Self> {
        let config = Self::load_from(Path::new(CONFIG_FILE))?;
        Ok(config.with_index_url_override(std::env::var(INDEX_URL_ENV).ok()))
    }

    /// Carrega a configuração de um caminho específico, sem consultar o ambiente.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = toml::from_str::<ScraperConfig>(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Substitui o template da URL índice quando um valor não vazio é fornecido.
    pub fn with_index_url_override(mut self, template: Option<String>) -> Self {
        if let Some(template) = template.filter(|t| !t.is_empty()) {
            self.index_url_template = template;
        }
        self
    }

    /// Slug da sessão, ou [`ScrapeError::UnknownSession`].
    pub fn session_slug(&self, session: &str) -> Result<&str, ScrapeError> {
        self.sessions
            .get(session)
            .map(String::as_str)
            .ok_or_else(|| ScrapeError::UnknownSession(session.to_string()))
    }

    /// URL da página índice dos diários de uma câmara e sessão.
    pub fn index_url(&self, chamber: Chamber, session: &str) -> Result<String, ScrapeError> {
        let slug = self.session_slug(session)?;
        Ok(self
            .index_url_template
            .replace("{session_slug}", slug)
            .replace("{chamber}", chamber.journal_name()))
    }

    /// Compila os padrões de cabeçalho e data.
    pub fn patterns(&self) -> Result<Patterns, ScrapeError> {
        Ok(Patterns::new(&self.header_pattern, &self.date_pattern)?)
    }
}
