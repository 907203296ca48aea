//! Interface de terminal do rollcall: spinner e resumo colorido.
//!
//! Usa as crates `indicatif` para o spinner de progresso e `console` para
//! estilização com cores. O [`ScrapeProgress`] acompanha visualmente
//! a leitura dos diários no terminal (stderr, para não misturar com os votos).

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::scraper::ScrapeSummary;

/// Indicador visual de progresso para uma execução de scrape.
pub struct ScrapeProgress {
    pb: ProgressBar,
    green: Style,
    yellow: Style,
    dim: Style,
}

impl ScrapeProgress {
    /// Inicia o spinner com uma descrição da execução.
    pub fn start(description: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(description.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        Self {
            pb,
            green: Style::new().green().bold(),
            yellow: Style::new().yellow(),
            dim: Style::new().dim(),
        }
    }

    /// Atualiza a mensagem do spinner com o documento atual.
    pub fn document(&self, position: usize, total: usize, locator: &str) {
        self.pb.set_message(format!("[{position}/{total}] {locator}"));
    }

    /// Finaliza o spinner e exibe o resumo da execução.
    pub fn finish(&self, summary: &ScrapeSummary) {
        self.pb.finish_and_clear();
        eprintln!(
            "  {} {} votes from {} of {} documents",
            self.green.apply_to("✓"),
            summary.votes_emitted,
            summary.documents_parsed,
            summary.documents_seen
        );
        if summary.documents_skipped > 0 {
            eprintln!(
                "  {} {} documents skipped",
                self.yellow.apply_to("↷"),
                summary.documents_skipped
            );
        }
        for warning in &summary.warnings {
            eprintln!("  {} {}", self.yellow.apply_to("!"), self.dim.apply_to(warning));
        }
    }

    /// Encerra o spinner sem resumo (execução abortada).
    pub fn abandon(&self) {
        self.pb.finish_and_clear();
    }
}
