//! Landing page: static usage notes shown before any ledger

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Equipment codes are a type prefix followed by a number, e.g. `SR03`.
static CODE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]+[0-9]+$").expect("code pattern is a valid regex")
});

#[derive(Debug, Clone, Serialize)]
pub struct HelpSection {
    pub title: &'static str,
    pub lines: &'static [&'static str],
}

#[derive(Debug, Clone, Serialize)]
pub struct LandingPage {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub sections: &'static [HelpSection],
}

const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Objetivo",
        lines: &[
            "Lançamento e controle dos insumos do Pote, da TL e dos rolos de fundo do Desengraxe,",
            "com rastreabilidade de cada movimentação.",
        ],
    },
    HelpSection {
        title: "Cadastro de rolos",
        lines: &[
            "Siga o padrão tipo_do_rolo + numeração, por exemplo: Sink Roll -> SR03.",
            "O código é gravado em maiúsculas.",
        ],
    },
    HelpSection {
        title: "Atualizações e histórico",
        lines: &[
            "Cada atualização acrescenta um novo registro ao histórico com o status atual;",
            "o registro anterior é preservado.",
            "Erros podem ser corrigidos em Editar/Excluir registros.",
        ],
    },
    HelpSection {
        title: "Atenção",
        lines: &[
            "Evite atualizações incorretas. Caso ocorra, exclua o registro e lance um novo",
            "com as informações corretas.",
        ],
    },
];

/// The static landing page.
#[must_use]
pub fn landing_page() -> LandingPage {
    LandingPage {
        title: "Controle de insumos (IVGI)",
        subtitle: "Pote / Tension leveller / Desengraxe",
        sections: SECTIONS,
    }
}

/// Whether `code` follows the recommended `PREFIX + number` format.
///
/// Advisory only: ledgers accept any non-empty code and log a warning for
/// codes that don't match.
#[must_use]
pub fn is_conventional_code(code: &str) -> bool {
    CODE_PATTERN.is_match(code)
}

impl std::fmt::Display for LandingPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.subtitle)?;
        for section in self.sections {
            writeln!(f)?;
            writeln!(f, "## {}", section.title)?;
            for line in section.lines {
                writeln!(f, "{line}")?;
            }
        }
        Ok(())
    }
}
