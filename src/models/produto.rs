// src/models/produto.rs

use serde::{Deserialize, Serialize};

/// Forma de pagamento registrada para um produto do catálogo. O código de
/// condição exposto ao resto do sistema é `"<tipo> | <parcelas>"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormaPagamento {
    pub tipo: String,
    pub parcelas: String,
    pub valor_total: String,
}

impl FormaPagamento {
    pub fn condicao(&self) -> String {
        format!("{} | {}", self.tipo.trim(), self.parcelas.trim())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Produto {
    pub codigo: String,
    pub nome: String,
    pub formas_pagamento: Vec<FormaPagamento>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condicao_usa_tipo_e_parcelas_aparados() {
        let forma = FormaPagamento {
            tipo: " A/C ".into(),
            parcelas: "1+1".into(),
            valor_total: "1000".into(),
        };
        assert_eq!(forma.condicao(), "A/C | 1+1");
    }
}
