// src/services/valores.rs
//
// Normalização e conferência dos campos monetários, que circulam pelo
// sistema como strings decimais com ponto (nunca float binário).

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{StatusVenda, Venda};

/// Converte um valor para string com separador decimal ".", trocando ",".
/// Se estiver vazio ou não for número, devolve o padrão sem alarde: isto é
/// um sanitizador de melhor esforço, não um validador.
pub fn normalizar_valor(valor: &str, padrao: &str) -> String {
    let valor = valor.trim().replace(',', ".");
    if valor.is_empty() {
        return padrao.to_string();
    }
    if valor.parse::<f64>().is_ok() {
        valor
    } else {
        padrao.to_string()
    }
}

/// Porta tudo-ou-nada sobre os cinco campos monetários de uma venda:
/// falso se qualquer um estiver ausente ou não parsear como número.
pub fn eh_numero(
    valor_real: Option<&str>,
    valor_tabela: Option<&str>,
    valor_entrada: Option<&str>,
    valor_venda_avista: Option<&str>,
    valor_parcelas: Option<&str>,
) -> bool {
    [valor_real, valor_tabela, valor_entrada, valor_venda_avista, valor_parcelas]
        .iter()
        .all(|valor| match valor {
            Some(v) => v.trim().parse::<f64>().is_ok(),
            None => false,
        })
}

/// Soma o `valor_real` das vendas (exceto canceladas), tolerando formatos
/// mistos como "1.234,56". Auxiliar da camada de relatórios; registros
/// inconversíveis são ignorados, não abortam a soma.
pub fn soma_vendas(vendas: &[Venda]) -> Decimal {
    let mut total = Decimal::ZERO;

    for venda in vendas {
        if venda.status == StatusVenda::Cancelada {
            continue;
        }
        let valor = venda.valor_real.trim();
        if valor.is_empty() {
            continue;
        }
        if let Some(parcela) = interpretar_valor_misto(valor) {
            total += parcela;
        }
    }

    total.round_dp(2)
}

// Decide o papel de "." e "," pela posição relativa: "1.234,56" tem ponto de
// milhar, "1,234.56" tem vírgula de milhar, "10,5" é decimal com vírgula.
fn interpretar_valor_misto(valor: &str) -> Option<Decimal> {
    let tem_virgula = valor.contains(',');
    let tem_ponto = valor.contains('.');

    let normalizado = match (tem_virgula, tem_ponto) {
        (false, _) => valor.to_string(),
        (true, false) => valor.replace(',', "."),
        (true, true) => {
            let posicao_virgula = valor.find(',');
            let posicao_ponto = valor.find('.');
            if posicao_virgula < posicao_ponto {
                valor.replace(',', "")
            } else {
                valor.replace('.', "").replace(',', ".")
            }
        }
    };

    Decimal::from_str(&normalizado).ok()
}

/// Leitura leniente usada no recálculo do banco de desconto: valor ausente
/// ou malformado vale zero só para aquele registro.
pub fn decimal_ou_zero(valor: &str) -> Decimal {
    Decimal::from_str(valor.trim()).unwrap_or(Decimal::ZERO)
}

/// Verdadeiro quando o valor normalizado representa zero ("0", "0.0", "0,0"
/// ou vazio), usado para barrar `valor_real` nulo na edição.
pub fn normaliza_para_zero(valor: &str) -> bool {
    let valor = valor.trim().replace(',', ".");
    if valor.is_empty() {
        return true;
    }
    match valor.parse::<f64>() {
        Ok(numero) => numero == 0.0,
        Err(_) => false,
    }
}
