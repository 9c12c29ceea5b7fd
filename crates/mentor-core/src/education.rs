//! Educational content catalog
//!
//! Static modules and quick tips about personal finance, in Brazilian
//! Portuguese. The catalog is fixed; progress (opened and completed
//! modules) lives on the session.

use serde::Serialize;

/// One educational module
///
/// Serialize-only: the catalog is static and never read back from JSON.
#[derive(Debug, Clone, Serialize)]
pub struct EducationModule {
    pub title: &'static str,
    pub description: &'static str,
    pub topics: &'static [&'static str],
}

/// A short standalone tip
#[derive(Debug, Clone, Serialize)]
pub struct QuickTip {
    pub title: &'static str,
    pub description: &'static str,
}

/// The module catalog, in display order
pub fn modules() -> &'static [EducationModule] {
    &[
        EducationModule {
            title: "Fundamentos de Finanças Pessoais",
            description: "Aprenda os conceitos básicos para organizar suas finanças.",
            topics: &[
                "Orçamento pessoal e familiar",
                "Diferença entre necessidades e desejos",
                "Como criar uma reserva de emergência",
                "Planejamento financeiro de curto e longo prazo",
            ],
        },
        EducationModule {
            title: "Gestão de Dívidas",
            description: "Estratégias para sair das dívidas e manter-se no azul.",
            topics: &[
                "Como identificar dívidas prioritárias",
                "Métodos de quitação: Bola de Neve vs. Avalanche",
                "Negociação com credores",
                "Consolidação de dívidas",
            ],
        },
        EducationModule {
            title: "Investimentos para Iniciantes",
            description: "Primeiros passos no mundo dos investimentos.",
            topics: &[
                "Renda fixa vs. Renda variável",
                "Perfil de investidor",
                "Diversificação e risco",
                "Investimentos para diferentes objetivos",
            ],
        },
    ]
}

/// Quick tips shown alongside the modules
pub fn quick_tips() -> &'static [QuickTip] {
    &[
        QuickTip {
            title: "Regra 50-30-20",
            description: "Divida seu orçamento em 50% para necessidades, 30% para desejos e 20% para poupança e investimentos.",
        },
        QuickTip {
            title: "Efeito Latte",
            description: "Pequenos gastos diários (como um café) podem somar quantias significativas ao longo do tempo.",
        },
        QuickTip {
            title: "Fundo de Emergência",
            description: "Tente guardar o equivalente a 3-6 meses de despesas para emergências.",
        },
    ]
}

/// Look up a module by its position in the catalog
pub fn module(index: usize) -> Option<&'static EducationModule> {
    modules().get(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_shape() {
        assert_eq!(modules().len(), 3);
        assert_eq!(quick_tips().len(), 3);
        for module in modules() {
            assert!(!module.topics.is_empty());
        }
    }

    #[test]
    fn module_lookup() {
        assert_eq!(module(1).unwrap().title, "Gestão de Dívidas");
        assert!(module(3).is_none());
    }

    #[test]
    fn catalog_serializes_to_json() {
        let json = serde_json::to_value(modules()).unwrap();
        assert_eq!(json[0]["title"], "Fundamentos de Finanças Pessoais");
        assert_eq!(json[0]["topics"].as_array().unwrap().len(), 4);

        let tips = serde_json::to_value(quick_tips()).unwrap();
        assert_eq!(tips[0]["title"], "Regra 50-30-20");
    }
}
