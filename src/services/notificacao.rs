// src/services/notificacao.rs
//
// Contrato do consumidor de notificações. O núcleo chama o colaborador
// exatamente uma vez por criação/edição, com o conjunto de destinatários já
// deduplicado (o conteúdo da mensagem nunca é deduplicado, só a lista). A
// chamada é fire-and-forget: falha aqui não desfaz nem reprova a venda.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::error::AppError;
use crate::models::Venda;

#[derive(Debug, Clone, Serialize)]
pub struct NovaNotificacao {
    /// Tipo do evento, ex.: "venda".
    pub tipo: String,
    pub mensagem: String,
    /// Snapshot da venda no momento do evento.
    pub venda: Option<Venda>,
    /// Usernames que devem receber o aviso, sem repetição e na ordem em que
    /// foram coletados.
    pub envolvidos: Vec<String>,
}

/// Registro persistido pelo consumidor (espelha o documento de notificação
/// do sistema; `lida_por` começa vazio e é preenchido fora deste núcleo).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notificacao {
    pub tipo: String,
    pub mensagem: String,
    pub data_hora: NaiveDateTime,
    pub lida_por: Vec<String>,
    pub envolvidos: Vec<String>,
    pub venda_numero: Option<String>,
}

#[async_trait]
pub trait Notificador: Send + Sync {
    async fn registrar(&self, notificacao: NovaNotificacao) -> Result<(), AppError>;
}

/// Remove repetições preservando a ordem da primeira ocorrência.
pub fn deduplicar(envolvidos: Vec<String>) -> Vec<String> {
    let mut vistos = std::collections::HashSet::new();
    envolvidos
        .into_iter()
        .filter(|username| !username.is_empty() && vistos.insert(username.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicar_preserva_a_primeira_ordem() {
        let lista = vec![
            "maria".to_string(),
            "joao".to_string(),
            "maria".to_string(),
            "admin".to_string(),
            "joao".to_string(),
        ];
        assert_eq!(deduplicar(lista), vec!["maria", "joao", "admin"]);
    }

    #[test]
    fn deduplicar_descarta_vazios() {
        let lista = vec!["".to_string(), "admin".to_string()];
        assert_eq!(deduplicar(lista), vec!["admin"]);
    }
}
