// src/services/email_venda.rs
//
// Contrato de envio do e-mail transacional de venda e a montagem do corpo
// HTML a partir dos campos já normalizados. O transporte em si (SMTP) é um
// colaborador externo, síncrono do ponto de vista do fluxo e sem retry.

use async_trait::async_trait;

use crate::common::error::AppError;
use crate::models::{ConfigGeral, Venda};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub assunto: String,
    pub remetente: String,
    pub destinatario: String,
    /// Cópias separadas por vírgula, podem vir vazias.
    pub copias: String,
    pub corpo_html: String,
    pub smtp: String,
    pub porta: u16,
    pub senha: String,
}

/// Transporte de e-mail. Fire-and-forget do ponto de vista da venda: uma
/// falha aqui jamais desfaz ou reprova a escrita da venda.
#[async_trait]
pub trait TransporteEmail: Send + Sync {
    async fn enviar(&self, email: Email) -> Result<(), AppError>;
}

/// Monta o e-mail de confirmação da venda para o vendedor. `None` quando a
/// configuração geral não tem remetente ativo.
pub fn email_de_venda(
    venda: &Venda,
    config: &ConfigGeral,
    destinatario: &str,
    reenvio: bool,
) -> Option<Email> {
    let remetente = config.remetente()?.to_string();
    let assunto = if reenvio {
        format!("REENVIO - {}", titulo(&venda.nome))
    } else {
        titulo(&venda.nome)
    };

    Some(Email {
        assunto,
        remetente,
        destinatario: destinatario.to_string(),
        copias: config.email_copia.clone(),
        corpo_html: corpo_email_venda(venda),
        smtp: config.smtp.clone(),
        porta: config.porta,
        senha: config.senha_email_smtp.clone(),
    })
}

/// Frase das condições de pagamento para o corpo do e-mail. A família 1+1
/// tem fraseado próprio (entrada+parcela ou à vista); as demais condições
/// usam o rótulo de parcelas do próprio código.
pub fn descreve_condicoes(venda: &Venda) -> String {
    let valor_entrada = venda.valor_entrada.trim();
    let tem_entrada = !matches!(valor_entrada, "" | "0");

    let condicao_compacta = venda.condicoes.replace(' ', "").trim().to_lowercase();
    let is_1mais1 = condicao_compacta == "a/c|1+1";

    let condicoes_venda = venda.condicoes_venda.trim().to_lowercase();
    let is_entrada_parcela = condicoes_venda == "entrada_parcela";
    let is_avista = condicoes_venda == "avista" || condicoes_venda == "à vista";

    let parcelas = venda.condicoes.trim().split('|').nth(1).unwrap_or("").trim();

    if tem_entrada && is_1mais1 && is_entrada_parcela {
        format!(
            "Entrada de R${valor_entrada} e uma parcela de R${}",
            venda.valor_parcelas
        )
    } else if !tem_entrada && is_1mais1 && is_avista {
        format!("À vista de R${}", venda.valor_venda_avista)
    } else if !tem_entrada && !is_1mais1 {
        format!("{parcelas} R${}", venda.valor_parcelas)
    } else if tem_entrada && !is_1mais1 {
        format!(
            "Entrada de R${valor_entrada} e {parcelas} R${}",
            venda.valor_parcelas
        )
    } else {
        String::new()
    }
}

fn corpo_email_venda(venda: &Venda) -> String {
    // data_prestacao_inicial chega como YYYY-MM-DD e sai DD/MM/YYYY
    let mut partes = venda.data_prestacao_inicial.splitn(3, '-');
    let ano = partes.next().unwrap_or("");
    let mes = partes.next().unwrap_or("");
    let dia = partes.next().unwrap_or("");
    let prestacao = format!("{dia}/{mes}/{ano}");

    let condicoes = descreve_condicoes(venda);

    format!(
        r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8">
  </head>
  <body style="font-family: Arial, sans-serif; font-size: 14px; color: #333;">
    <h2>Dados Pessoais</h2>
    <p><strong>NOME/RAZÃO SOCIAL:</strong> {nome}<br>
       <strong>CONTATO:</strong> {contato}<br>
       <strong>CPF/CNPJ:</strong> {cnpj_cpf}<br>
       <strong>IE:</strong> {inscricao}<br>
       <strong>E-MAIL:</strong> {email}<br>
       <strong>TELEFONES:</strong> {fones}</p>

    <h2>Endereço</h2>
    <p><strong>RUA:</strong> {rua}<br>
       <strong>BAIRRO:</strong> {bairro}<br>
       <strong>NÚMERO:</strong> {numero}<br>
       <strong>CIDADE:</strong> {cidade}<br>
       <strong>ESTADO:</strong> {estado}<br>
       <strong>CEP:</strong> {cep}</p>

    <h2>Dados da Venda</h2>
    <p><strong>PRODUTO:</strong> {produto}<br>
       <strong>CONDIÇÕES:</strong> {condicoes}<br>
       <strong>PRESTAÇÃO INICIAL:</strong> {prestacao}<br>
       <strong>VALOR TOTAL DO PRODUTO:</strong> R${valor_real}<br>
       <strong>TIPO DE ENVIO DE BOLETO:</strong> {tipo_envio}<br>
       <strong>VENDEDOR:</strong> {vendedor}</p>

    <h2>Observações</h2>
    <p>{obs}</p><br><br>

    <hr>
    <p style="font-size: 12px; color: gray;">E-mail gerado automaticamente pelo sistema.</p>
  </body>
</html>
"#,
        nome = venda.nome.to_uppercase(),
        contato = venda.nome_do_contato.to_uppercase(),
        cnpj_cpf = venda.cnpj_cpf,
        inscricao = venda.inscricao_estadual_identidade,
        email = venda.email.to_lowercase(),
        fones = venda.fones,
        rua = venda.endereco.rua.to_uppercase(),
        bairro = venda.endereco.bairro.to_uppercase(),
        numero = venda.endereco.numero.to_uppercase(),
        cidade = venda.endereco.cidade.to_uppercase(),
        estado = venda.endereco.estado.to_uppercase(),
        cep = venda.cep,
        produto = venda.produto.to_uppercase(),
        condicoes = condicoes.to_uppercase(),
        prestacao = prestacao,
        valor_real = venda.valor_real,
        tipo_envio = venda.tipo_envio_boleto.to_uppercase(),
        vendedor = venda.vendedor.to_uppercase(),
        obs = venda.obs.to_uppercase(),
    )
}

// Title-case simples por palavra, preservando o espaçamento original.
fn titulo(texto: &str) -> String {
    let mut saida = String::with_capacity(texto.len());
    let mut inicio_de_palavra = true;
    for c in texto.chars() {
        if c.is_whitespace() {
            inicio_de_palavra = true;
            saida.push(c);
        } else if inicio_de_palavra {
            saida.extend(c.to_uppercase());
            inicio_de_palavra = false;
        } else {
            saida.extend(c.to_lowercase());
        }
    }
    saida
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CredencialEmail;
    use crate::services::venda_service::tests_support::venda_exemplo;

    fn config_ativa() -> ConfigGeral {
        ConfigGeral {
            smtp: "smtp.exemplo.com".into(),
            porta: 465,
            email_smtp_principal: CredencialEmail { endereco: "vendas@exemplo.com".into(), ativo: true },
            email_smtp_secundario: CredencialEmail::default(),
            email_copia: "copias@exemplo.com".into(),
            senha_email_smtp: "segredo".into(),
        }
    }

    #[test]
    fn condicao_1mais1_avista() {
        let mut venda = venda_exemplo();
        venda.condicoes = "A/C | 1+1".into();
        venda.condicoes_venda = "avista".into();
        venda.valor_entrada = "0".into();
        venda.valor_venda_avista = "950.00".into();
        assert_eq!(descreve_condicoes(&venda), "À vista de R$950.00");
    }

    #[test]
    fn condicao_1mais1_entrada_parcela() {
        let mut venda = venda_exemplo();
        venda.condicoes = "A/C | 1+1".into();
        venda.condicoes_venda = "entrada_parcela".into();
        venda.valor_entrada = "300".into();
        venda.valor_parcelas = "700".into();
        assert_eq!(
            descreve_condicoes(&venda),
            "Entrada de R$300 e uma parcela de R$700"
        );
    }

    #[test]
    fn condicao_parcelada_sem_entrada() {
        let mut venda = venda_exemplo();
        venda.condicoes = "Boleto | 12x".into();
        venda.condicoes_venda = "".into();
        venda.valor_entrada = "0".into();
        venda.valor_parcelas = "100.00".into();
        assert_eq!(descreve_condicoes(&venda), "12x R$100.00");
    }

    #[test]
    fn condicao_parcelada_com_entrada() {
        let mut venda = venda_exemplo();
        venda.condicoes = "Boleto | 12x".into();
        venda.valor_entrada = "250".into();
        venda.valor_parcelas = "90".into();
        assert_eq!(descreve_condicoes(&venda), "Entrada de R$250 e 12x R$90");
    }

    #[test]
    fn assunto_usa_o_nome_em_title_case() {
        let mut venda = venda_exemplo();
        venda.nome = "ACME INDÚSTRIA LTDA".into();
        let email = email_de_venda(&venda, &config_ativa(), "maria@exemplo.com", false).unwrap();
        assert_eq!(email.assunto, "Acme Indústria Ltda");

        let reenvio = email_de_venda(&venda, &config_ativa(), "maria@exemplo.com", true).unwrap();
        assert_eq!(reenvio.assunto, "REENVIO - Acme Indústria Ltda");
    }

    #[test]
    fn corpo_converte_a_data_de_prestacao() {
        let mut venda = venda_exemplo();
        venda.data_prestacao_inicial = "2024-06-15".into();
        let email = email_de_venda(&venda, &config_ativa(), "maria@exemplo.com", false).unwrap();
        assert!(email.corpo_html.contains("15/06/2024"));
    }

    #[test]
    fn sem_remetente_ativo_nao_ha_email() {
        let mut config = config_ativa();
        config.email_smtp_principal.ativo = false;
        assert!(email_de_venda(&venda_exemplo(), &config, "x@y.com", false).is_none());
    }
}
