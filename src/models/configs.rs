// src/models/configs.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Documento singleton de fechamento de expediente. `data` e `hora` ficam
/// como strings (`DD/MM/YYYY` / `HH:MM:SS`) e são interpretadas pela
/// política de expediente, que trata qualquer falha de parse como "sem
/// configuração".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FimExpediente {
    pub data: Option<String>,
    pub hora: String,
    #[serde(default)]
    pub trabalha_sabado: bool,
}

/// Slot de remetente SMTP com flag explícita de ativação, no lugar do
/// antigo formato "email@x.com:true" embutido na string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CredencialEmail {
    pub endereco: String,
    pub ativo: bool,
}

/// Configuração geral de envio de e-mail (documento singleton "geral").
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigGeral {
    pub smtp: String,
    pub porta: u16,
    pub email_smtp_principal: CredencialEmail,
    pub email_smtp_secundario: CredencialEmail,
    /// E-mails em cópia, separados por vírgula.
    pub email_copia: String,
    pub senha_email_smtp: String,
}

impl ConfigGeral {
    /// Seleciona o remetente por prioridade explícita: principal se ativo,
    /// senão o secundário se ativo.
    pub fn remetente(&self) -> Option<&str> {
        if self.email_smtp_principal.ativo {
            Some(self.email_smtp_principal.endereco.as_str())
        } else if self.email_smtp_secundario.ativo {
            Some(self.email_smtp_secundario.endereco.as_str())
        } else {
            None
        }
    }
}

/// Saldo corrente do banco de desconto de um vendedor, mantido por fluxo
/// administrativo externo e apenas lido por este núcleo.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiteVendedor {
    pub vendedor_nome: String,
    pub limite: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remetente_prioriza_principal_ativo() {
        let config = ConfigGeral {
            email_smtp_principal: CredencialEmail { endereco: "a@x.com".into(), ativo: true },
            email_smtp_secundario: CredencialEmail { endereco: "b@x.com".into(), ativo: true },
            ..ConfigGeral::default()
        };
        assert_eq!(config.remetente(), Some("a@x.com"));
    }

    #[test]
    fn remetente_cai_para_secundario() {
        let config = ConfigGeral {
            email_smtp_principal: CredencialEmail { endereco: "a@x.com".into(), ativo: false },
            email_smtp_secundario: CredencialEmail { endereco: "b@x.com".into(), ativo: true },
            ..ConfigGeral::default()
        };
        assert_eq!(config.remetente(), Some("b@x.com"));
    }

    #[test]
    fn sem_remetente_quando_nenhum_ativo() {
        assert_eq!(ConfigGeral::default().remetente(), None);
    }
}
