// src/services/banco_desconto.rs
//
// Recálculo, em tempo de leitura, do banco de desconto por vendedor sobre
// uma janela de vendas já filtrada aos status faturáveis (Aprovada e
// Faturado). Desconto não autorizado debita o banco; venda acima da tabela
// credita; desconto autorizado é "de graça".

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;

use crate::models::Venda;
use crate::services::valores::decimal_ou_zero;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClasseSaldo {
    /// `novo > atual`: o banco cresceu no período.
    Cresceu,
    /// `novo <= 0`: banco esgotado ou negativo.
    Esgotado,
    /// Caiu em relação ao atual mas segue positivo.
    Reduzido,
}

/// Saldo de um vendedor: o limite armazenado, o delta do período e a soma
/// dos dois (arredondada a 2 casas no delta, como o relatório original).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SaldoBanco {
    pub atual: Decimal,
    pub calculado: Decimal,
    pub novo: Decimal,
}

impl SaldoBanco {
    pub fn classe(&self) -> ClasseSaldo {
        if self.novo > self.atual {
            ClasseSaldo::Cresceu
        } else if self.novo <= Decimal::ZERO {
            ClasseSaldo::Esgotado
        } else {
            ClasseSaldo::Reduzido
        }
    }
}

/// Calcula os saldos por vendedor. Só entram no mapa vendedores com alguma
/// contribuição não nula no período: vendas com `diff == 0` (ou desconto
/// autorizado) não criam entrada. Valores malformados num registro valem
/// zero só para aquele registro, sem abortar o cálculo inteiro.
pub fn calcular_saldos(
    vendas: &[Venda],
    limites: &HashMap<String, Decimal>,
) -> HashMap<String, SaldoBanco> {
    let mut deltas: HashMap<String, Decimal> = HashMap::new();

    for venda in vendas {
        let valor_tabela = decimal_ou_zero(&venda.valor_tabela);
        let valor_real = decimal_ou_zero(&venda.valor_real);
        let diferenca = valor_real - valor_tabela;

        if diferenca < Decimal::ZERO && !venda.desconto_autorizado {
            *deltas.entry(venda.vendedor.clone()).or_insert(Decimal::ZERO) -= diferenca.abs();
        } else if diferenca > Decimal::ZERO {
            *deltas.entry(venda.vendedor.clone()).or_insert(Decimal::ZERO) += diferenca;
        }
    }

    deltas
        .into_iter()
        .map(|(vendedor, delta)| {
            let atual = limites.get(&vendedor).copied().unwrap_or(Decimal::ZERO);
            let calculado = delta.round_dp(2);
            let novo = atual + calculado;
            (vendedor, SaldoBanco { atual, calculado, novo })
        })
        .collect()
}
