// src/services/validacao.rs
//
// Predicados puros sobre texto vindo da requisição mais o catálogo
// registrado. Nenhum deles rejeita a requisição sozinho: devolvem bool (ou
// o índice do primeiro ofensor) para o orquestrador montar uma mensagem de
// erro única e específica por campo.

use validator::ValidateEmail;

use crate::models::{Produto, StatusVenda, TipoCliente};

/// Comprimento mínimo de um telefone formatado (DDI + DDD + pontuação).
const TAMANHO_MINIMO_FONE: usize = 17;

/// Índice do primeiro e-mail sintaticamente inválido, se houver.
pub fn primeiro_email_invalido(emails: &[String]) -> Option<usize> {
    emails.iter().position(|email| !email.validate_email())
}

/// Índice do primeiro telefone curto demais, se houver.
pub fn primeiro_fone_invalido(fones: &[String]) -> Option<usize> {
    fones.iter().position(|fone| fone.len() < TAMANHO_MINIMO_FONE)
}

/// Um produto simples precisa bater exatamente com um nome do catálogo. Um
/// composto "Personalizado: A, B" exige lista não vazia após o split por
/// vírgula e que TODOS os itens estejam no catálogo.
pub fn verifica_produto(produto: &str, catalogo: &[Produto]) -> bool {
    if let Some(resto) = produto.strip_prefix("Personalizado:") {
        let personalizados: Vec<&str> = resto
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        // "Personalizado: " sem itens é inválido mesmo com prefixo certo
        if personalizados.is_empty() {
            return false;
        }
        return personalizados
            .iter()
            .all(|p| catalogo.iter().any(|registrado| registrado.nome == *p));
    }

    catalogo.iter().any(|registrado| registrado.nome == produto)
}

/// Verdadeiro sse o código bate com `"<tipo> | <parcelas>"` de alguma forma
/// de pagamento registrada. Catálogo vazio reprova qualquer código.
pub fn verifica_condicoes(condicoes: &str, catalogo: &[Produto]) -> bool {
    catalogo
        .iter()
        .flat_map(|produto| produto.formas_pagamento.iter())
        .any(|forma| forma.condicao() == condicoes)
}

/// `None` e vazio são aceitos (cliente sem classificação).
pub fn verifica_tipo_cliente(tipo_cliente: Option<&str>) -> bool {
    match tipo_cliente {
        None => true,
        Some(raw) => TipoCliente::parse(raw).is_some(),
    }
}

/// `None` e vazio são aceitos; grafias alternativas e plurais não.
pub fn verifica_status_venda(status: Option<&str>) -> bool {
    match status {
        None => true,
        Some(raw) => raw.trim().is_empty() || StatusVenda::parse(raw).is_some(),
    }
}
