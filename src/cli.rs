//! Interface de linha de comando do rollcall baseada em clap.
//!
//! Define a struct [`Cli`] com subcomandos [`Command`] (scrape, parse, sessions)
//! e flags globais (--output, --verbose).

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::journal::Chamber;

/// rollcall: extrai votações nominais dos diários legislativos.
#[derive(Debug, Parser)]
#[command(name = "rollcall", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Arquivo JSON Lines de saída (padrão: stdout).
    #[arg(long, short, global = true)]
    pub output: Option<PathBuf>,

    /// Habilita saída detalhada (verbose).
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Câmara aceita pela CLI, mapeada para [`Chamber`] internamente.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ChamberArg {
    /// Câmara baixa (House).
    Lower,
    /// Câmara alta (Senate).
    Upper,
}

impl From<ChamberArg> for Chamber {
    fn from(arg: ChamberArg) -> Self {
        match arg {
            ChamberArg::Lower => Chamber::Lower,
            ChamberArg::Upper => Chamber::Upper,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Baixa e processa os diários publicados de uma câmara e sessão.
    Scrape {
        #[arg(long, value_enum)]
        chamber: ChamberArg,

        /// Identificador da sessão (ex.: 64).
        #[arg(long)]
        session: String,
    },

    /// Processa diários já convertidos para texto (*.txt) em um diretório.
    Parse {
        /// Diretório com os arquivos de texto.
        dir: PathBuf,

        #[arg(long, value_enum)]
        chamber: ChamberArg,

        #[arg(long)]
        session: String,
    },

    /// Lista as sessões configuradas.
    Sessions,
}
