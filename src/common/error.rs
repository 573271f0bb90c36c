// src/common/error.rs

use thiserror::Error;

/// Erros do núcleo de vendas, com `thiserror` para melhor ergonomia.
///
/// Quatro categorias: rejeição de validação (corrigível pelo cliente, com
/// campo e mensagem específicos), rejeição de permissão, venda não
/// encontrada e falha de infraestrutura. Todas as validações rodam antes de
/// qualquer escrita, então nenhum estado parcial é persistido.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{mensagem}")]
    Validacao {
        campo: &'static str,
        mensagem: String,
    },

    #[error("Sem permissão")]
    SemPermissao,

    #[error("Venda não encontrada")]
    VendaNaoEncontrada,

    /// Colisão do sequencial `numero_da_venda` na inserção; o ciclo de vida
    /// recalcula o número e tenta de novo um número limitado de vezes.
    #[error("Número de venda já emitido")]
    NumeroVendaEmUso,

    /// Falha de persistência na inserção, carregando o número já consumido
    /// (que não é reutilizado) para rastreio de lacunas na sequência.
    #[error("Falha ao gravar a venda {numero_da_venda}")]
    FalhaPersistencia {
        numero_da_venda: String,
        #[source]
        fonte: anyhow::Error,
    },

    // Variante genérica para erros do armazenamento externo.
    #[error("Erro de armazenamento")]
    Armazenamento(#[from] anyhow::Error),

    #[error("Falha no envio de e-mail: {0}")]
    Email(String),
}

impl AppError {
    pub fn validacao(campo: &'static str, mensagem: impl Into<String>) -> AppError {
        AppError::Validacao {
            campo,
            mensagem: mensagem.into(),
        }
    }

    /// O campo ofensor, quando o erro é uma rejeição de validação.
    pub fn campo(&self) -> Option<&'static str> {
        match self {
            AppError::Validacao { campo, .. } => Some(campo),
            _ => None,
        }
    }
}
