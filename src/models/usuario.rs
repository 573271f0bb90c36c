// src/models/usuario.rs

use serde::{Deserialize, Serialize};

/// Papel do usuário no sistema. As permissões de transição de status são
/// restritivas apenas para `Vendedor` e `Faturamento`; os demais papéis não
/// sofrem restrição neste núcleo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TipoUsuario {
    Admin,
    Vendedor,
    Faturamento,
    PosVendas,
}

impl TipoUsuario {
    /// Parse tolerante a caixa e espaços, espelhando as comparações
    /// `.strip().lower()` feitas nos pontos de checagem de permissão.
    pub fn parse(raw: &str) -> Option<TipoUsuario> {
        match raw.trim().to_lowercase().as_str() {
            "admin" => Some(TipoUsuario::Admin),
            "vendedor" => Some(TipoUsuario::Vendedor),
            "faturamento" => Some(TipoUsuario::Faturamento),
            "pos_vendas" => Some(TipoUsuario::PosVendas),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usuario {
    pub nome_completo: String,
    pub username: String,
    pub email: String,
    pub fone: String,
    pub tipo: TipoUsuario,
    /// "ativo" / "bloqueado" / "inativo", gerido por fluxos externos.
    pub status: String,
    /// Username do responsável pós-venda atribuído ao vendedor.
    pub pos_vendas: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_tipo_com_caixa_mista() {
        assert_eq!(TipoUsuario::parse(" Faturamento "), Some(TipoUsuario::Faturamento));
        assert_eq!(TipoUsuario::parse("VENDEDOR"), Some(TipoUsuario::Vendedor));
        assert_eq!(TipoUsuario::parse("gerente"), None);
    }
}
