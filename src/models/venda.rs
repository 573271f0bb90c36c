// src/models/venda.rs

use chrono::NaiveDateTime;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// Status canônico de uma venda. A entrada é aceita sem distinção de
/// maiúsculas/minúsculas, mas o valor persistido é sempre a forma
/// capitalizada (contrato externo bit-exato).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusVenda {
    Aguardando,
    Aprovada,
    Refazer,
    Cancelada,
    Faturado,
}

impl StatusVenda {
    /// Parse canonizante: aceita qualquer caixa, com espaços nas bordas.
    /// Retorna `None` para textos fora do vocabulário.
    pub fn parse(raw: &str) -> Option<StatusVenda> {
        match raw.trim().to_lowercase().as_str() {
            "aguardando" => Some(StatusVenda::Aguardando),
            "aprovada" => Some(StatusVenda::Aprovada),
            "refazer" => Some(StatusVenda::Refazer),
            "cancelada" => Some(StatusVenda::Cancelada),
            "faturado" => Some(StatusVenda::Faturado),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusVenda::Aguardando => "Aguardando",
            StatusVenda::Aprovada => "Aprovada",
            StatusVenda::Refazer => "Refazer",
            StatusVenda::Cancelada => "Cancelada",
            StatusVenda::Faturado => "Faturado",
        }
    }

    /// Transições válidas do ciclo de vida. `Cancelada` e `Faturado` são
    /// terminais para este núcleo (faturamento externo cuida do resto).
    pub fn pode_transicionar_para(&self, novo: StatusVenda) -> bool {
        use StatusVenda::*;
        match self {
            Aguardando => matches!(novo, Aprovada | Refazer | Cancelada),
            Aprovada => matches!(novo, Faturado | Cancelada | Refazer),
            Refazer => matches!(novo, Aguardando),
            Cancelada | Faturado => false,
        }
    }

    /// Descrição legível usada nas mensagens de notificação.
    pub fn descricao_legivel(&self) -> &'static str {
        match self {
            StatusVenda::Aguardando => "em preparação",
            StatusVenda::Aprovada => "aprovada",
            StatusVenda::Refazer => "marcada para refazer",
            StatusVenda::Cancelada => "cancelada",
            StatusVenda::Faturado => "faturado",
        }
    }
}

impl fmt::Display for StatusVenda {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusVenda {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for StatusVenda {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        StatusVenda::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("status de venda desconhecido: {raw}")))
    }
}

/// Classificação comercial do cliente. `Nenhum` é serializado como string
/// vazia, como o documento original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TipoCliente {
    #[default]
    Nenhum,
    Verde,
    Vermelho,
}

impl TipoCliente {
    pub fn parse(raw: &str) -> Option<TipoCliente> {
        match raw.trim().to_lowercase().as_str() {
            "" => Some(TipoCliente::Nenhum),
            "verde" => Some(TipoCliente::Verde),
            "vermelho" => Some(TipoCliente::Vermelho),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TipoCliente::Nenhum => "",
            TipoCliente::Verde => "Verde",
            TipoCliente::Vermelho => "Vermelho",
        }
    }
}

impl Serialize for TipoCliente {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TipoCliente {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TipoCliente::parse(&raw)
            .ok_or_else(|| de::Error::custom(format!("tipo de cliente desconhecido: {raw}")))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endereco {
    pub rua: String,
    pub bairro: String,
    pub numero: String,
    pub cidade: String,
    pub estado: String,
}

/// Entrada do log de auditoria da venda. A lista só cresce: uma entrada na
/// criação e uma por edição, nunca reescrita.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistroLog {
    /// Instante de parede da mutação, formatado `%d/%m/%Y %H:%M`.
    pub data_hora: String,
    pub quem: String,
    pub modificacao: String,
}

impl RegistroLog {
    pub fn novo(agora: NaiveDateTime, quem: &str, modificacao: &str) -> RegistroLog {
        RegistroLog {
            data_hora: agora.format("%d/%m/%Y %H:%M").to_string(),
            quem: quem.to_string(),
            modificacao: modificacao.to_string(),
        }
    }
}

/// Documento central do sistema. Os campos monetários são sempre strings
/// decimais com ponto (nunca float binário), normalizadas na escrita.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Venda {
    /// Sequencial único no formato `YYYYMM####`, imutável após atribuído.
    pub numero_da_venda: String,
    pub usuario_id: Option<Uuid>,

    pub nome: String,
    pub nome_do_contato: String,
    pub endereco: Endereco,
    pub cep: String,
    pub cnpj_cpf: String,
    pub razao_social: String,
    pub inscricao_estadual_identidade: String,
    pub email: String,
    pub fones: String,

    pub produto: String,
    pub condicoes: String,
    /// Qualificador secundário usado só pela família 1+1:
    /// "", "avista" ou "entrada_parcela".
    pub condicoes_venda: String,

    pub valor_tabela: String,
    pub valor_real: String,
    pub valor_entrada: String,
    pub valor_venda_avista: String,
    pub valor_parcelas: String,

    pub data_prestacao_inicial: String,
    pub tipo_envio_boleto: String,
    pub tipo_remessa: String,

    pub vendedor: String,
    pub fone_vendedor: String,
    pub email_vendedor: String,
    /// Derivado do cadastro do vendedor na escrita; nunca vem do cliente.
    pub posvendas: String,

    pub status: StatusVenda,
    pub tipo_cliente: TipoCliente,

    /// Data efetiva usada pelos relatórios por período (ver expediente.rs).
    pub data_criacao: NaiveDateTime,
    /// Instante real de parede da criação, usado nos relatórios de fim de
    /// semana.
    pub data_real: NaiveDateTime,

    pub obs: String,
    pub obs_vendas: String,
    pub caminho_arquivos: String,

    pub desconto_autorizado: bool,
    pub desconto_live: bool,
    pub motivo_desconto_live: String,

    pub quantidade_acessos: i64,

    pub logs: Vec<RegistroLog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_aceita_qualquer_caixa() {
        assert_eq!(StatusVenda::parse("aprovada"), Some(StatusVenda::Aprovada));
        assert_eq!(StatusVenda::parse(" FATURADO "), Some(StatusVenda::Faturado));
        assert_eq!(StatusVenda::parse("Aguardando"), Some(StatusVenda::Aguardando));
    }

    #[test]
    fn parse_status_rejeita_plurais_e_variantes() {
        assert_eq!(StatusVenda::parse("aprovadas"), None);
        assert_eq!(StatusVenda::parse("faturada"), None);
        assert_eq!(StatusVenda::parse("cancelado"), None);
        assert_eq!(StatusVenda::parse(""), None);
    }

    #[test]
    fn status_serializa_na_forma_capitalizada() {
        let json = serde_json::to_string(&StatusVenda::Refazer).unwrap();
        assert_eq!(json, "\"Refazer\"");
    }

    #[test]
    fn transicoes_terminais() {
        assert!(!StatusVenda::Cancelada.pode_transicionar_para(StatusVenda::Aguardando));
        assert!(!StatusVenda::Faturado.pode_transicionar_para(StatusVenda::Refazer));
        assert!(StatusVenda::Refazer.pode_transicionar_para(StatusVenda::Aguardando));
        assert!(!StatusVenda::Aguardando.pode_transicionar_para(StatusVenda::Faturado));
    }

    #[test]
    fn tipo_cliente_vazio_eh_nenhum() {
        assert_eq!(TipoCliente::parse("  "), Some(TipoCliente::Nenhum));
        assert_eq!(TipoCliente::parse("VERDE"), Some(TipoCliente::Verde));
        assert_eq!(TipoCliente::parse("azul"), None);
    }

    #[test]
    fn registro_log_formata_data_brasileira() {
        let agora = NaiveDateTime::parse_from_str("2024-06-03 14:05:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let log = RegistroLog::novo(agora, "maria", "Criação da venda");
        assert_eq!(log.data_hora, "03/06/2024 14:05");
    }
}
