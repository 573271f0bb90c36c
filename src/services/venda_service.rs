// src/services/venda_service.rs
//
// Orquestrador do ciclo de vida da venda: cadastro, edição e o recálculo do
// banco de desconto. Todas as validações rodam antes de qualquer escrita;
// e-mail e notificação são efeitos fire-and-forget disparados depois da
// gravação, nunca antes.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, warn};
use uuid::Uuid;

use crate::common::error::AppError;
use crate::db::{ConfigStore, ProdutoStore, UsuarioStore, VendaStore};
use crate::models::{Endereco, RegistroLog, StatusVenda, TipoCliente, TipoUsuario, Usuario, Venda};
use crate::services::banco_desconto::{calcular_saldos, SaldoBanco};
use crate::services::email_venda::{email_de_venda, TransporteEmail};
use crate::services::expediente::resolver_data_criacao;
use crate::services::notificacao::{deduplicar, Notificador, NovaNotificacao};
use crate::services::validacao::{
    primeiro_email_invalido, primeiro_fone_invalido, verifica_condicoes, verifica_produto,
    verifica_status_venda,
};
use crate::services::valores::{eh_numero, normaliza_para_zero, normalizar_valor};

/// Tentativas de inserção quando o sequencial do mês colide com uma venda
/// gravada por outra requisição no meio do caminho.
const TENTATIVAS_NUMERO: usize = 3;

/// Dados de entrada do cadastro de uma venda. Listas de contato chegam já
/// separadas; campos monetários chegam como texto livre e são normalizados
/// aqui.
#[derive(Debug, Clone, Default)]
pub struct NovaVenda {
    pub usuario_id: Option<Uuid>,

    pub nome: String,
    pub nome_do_contato: String,
    pub cnpj_cpf: String,
    pub razao_social: String,
    pub inscricao_estadual_identidade: String,
    pub cep: String,
    pub endereco: Endereco,

    pub emails: Vec<String>,
    pub fones: Vec<String>,

    /// Produto registrado; vazio quando o cliente monta um personalizado.
    pub produto: String,
    /// Lista livre separada por vírgula; só considerada com `produto` vazio.
    pub produtos_personalizados: String,
    pub condicoes: String,
    pub condicoes_venda: String,
    /// Deve vir vazio: o status inicial é sempre Aguardando.
    pub status: String,
    pub tipo_cliente: String,

    pub valor_tabela: String,
    pub valor_real: String,
    pub valor_entrada: String,
    pub valor_venda_avista: String,
    pub valor_parcelas: String,

    pub data_prestacao_inicial: String,
    pub tipo_remessa: String,

    pub vendedor: String,
    pub fone_vendedor: String,
    pub email_vendedor: String,

    pub obs: String,
    pub obs_vendas: String,
    pub caminho_arquivos: String,

    pub desconto_autorizado: bool,
    pub quantidade_acessos: Option<i64>,
}

/// Dados de entrada da edição. `None` significa "campo não enviado": o
/// valor gravado é mantido para os campos da whitelist e os campos
/// financeiros sensíveis a presença (`valor_entrada`, `valor_venda_avista`,
/// `valor_real`, `condicoes_venda`) não são renormalizados.
#[derive(Debug, Clone, Default)]
pub struct EdicaoVenda {
    pub numero_da_venda: String,

    pub nome: Option<String>,
    pub nome_do_contato: Option<String>,
    pub cep: Option<String>,
    pub email: Option<String>,
    pub fones: Option<String>,
    pub cnpj_cpf: Option<String>,
    pub razao_social: Option<String>,
    pub inscricao_estadual_identidade: Option<String>,

    pub endereco_rua: Option<String>,
    pub endereco_bairro: Option<String>,
    pub endereco_numero: Option<String>,
    pub endereco_cidade: Option<String>,
    pub endereco_estado: Option<String>,

    pub produto: Option<String>,
    pub produtos_personalizados: String,
    pub condicoes: Option<String>,
    pub condicoes_venda: Option<String>,
    pub tipo_cliente: Option<String>,
    pub status: Option<String>,

    pub valor_tabela: Option<String>,
    pub valor_real: Option<String>,
    pub valor_entrada: Option<String>,
    pub valor_venda_avista: Option<String>,
    pub valor_parcelas: Option<String>,

    pub data_prestacao_inicial: Option<String>,
    pub tipo_remessa: Option<String>,
    pub obs: Option<String>,
    pub obs_vendas: Option<String>,
    pub caminho_arquivos: Option<String>,
    pub quantidade_acessos: Option<i64>,

    pub desconto_autorizado: Option<bool>,
    pub desconto_live: Option<bool>,
    pub motivo_desconto_live: Option<String>,
}

pub struct VendaService {
    vendas: Arc<dyn VendaStore>,
    usuarios: Arc<dyn UsuarioStore>,
    produtos: Arc<dyn ProdutoStore>,
    configs: Arc<dyn ConfigStore>,
    email: Arc<dyn TransporteEmail>,
    notificador: Arc<dyn Notificador>,
}

impl VendaService {
    pub fn new(
        vendas: Arc<dyn VendaStore>,
        usuarios: Arc<dyn UsuarioStore>,
        produtos: Arc<dyn ProdutoStore>,
        configs: Arc<dyn ConfigStore>,
        email: Arc<dyn TransporteEmail>,
        notificador: Arc<dyn Notificador>,
    ) -> Self {
        Self {
            vendas,
            usuarios,
            produtos,
            configs,
            email,
            notificador,
        }
    }

    /// Cadastra uma venda nova. Valida tudo, resolve o agendamento de fim
    /// de expediente, emite o sequencial do mês e grava; só depois dispara
    /// o e-mail para o vendedor e a notificação para os envolvidos.
    pub async fn cadastrar(
        &self,
        ator: &Usuario,
        dados: NovaVenda,
        agora: NaiveDateTime,
    ) -> Result<Venda, AppError> {
        let emails: Vec<String> = dados
            .emails
            .iter()
            .map(|email| email.trim().to_string())
            .filter(|email| !email.is_empty())
            .collect();
        if emails.is_empty() {
            return Err(AppError::validacao(
                "emails",
                "É obrigatório informar pelo menos um e-mail.",
            ));
        }
        if let Some(indice) = primeiro_email_invalido(&emails) {
            return Err(AppError::validacao(
                "emails",
                format!("O email {} não é válido.", emails[indice]),
            ));
        }

        let fones: Vec<String> = dados
            .fones
            .iter()
            .map(|fone| fone.trim().to_string())
            .filter(|fone| !fone.is_empty())
            .collect();
        if fones.is_empty() {
            return Err(AppError::validacao(
                "fones",
                "É obrigatório informar pelo menos um telefone.",
            ));
        }
        if let Some(indice) = primeiro_fone_invalido(&fones) {
            return Err(AppError::validacao(
                "fones",
                format!("O número {} não é válido.", fones[indice]),
            ));
        }

        let catalogo = self.produtos.listar().await?;

        // Produto personalizado: só sintetiza quando o campo registrado
        // veio vazio (na edição a regra é mais ampla, de propósito).
        let produto = if dados.produto.is_empty() && !dados.produtos_personalizados.trim().is_empty()
        {
            sintetiza_personalizado(&dados.produtos_personalizados)
        } else {
            dados.produto.clone()
        };
        if !verifica_produto(&produto, &catalogo) {
            return Err(AppError::validacao(
                "produto",
                format!("O produto {produto} não está cadastrado."),
            ));
        }

        let condicoes = if dados.condicoes.trim().is_empty() {
            "1".to_string()
        } else {
            dados.condicoes.clone()
        };
        if !verifica_condicoes(&condicoes, &catalogo) {
            return Err(AppError::validacao(
                "condicoes",
                format!("A condição {condicoes} não está cadastrada."),
            ));
        }

        // O status inicial é sempre Aguardando; um valor enviado só é
        // conferido contra o vocabulário, nunca aproveitado.
        if !verifica_status_venda(Some(&dados.status)) {
            return Err(AppError::validacao(
                "status",
                format!("O Status da Venda {} não existe.", dados.status),
            ));
        }

        let tipo_cliente = TipoCliente::parse(&dados.tipo_cliente).ok_or_else(|| {
            AppError::validacao(
                "tipo_cliente",
                format!("O tipo de cliente {} não existe.", dados.tipo_cliente),
            )
        })?;

        let quantidade_acessos = dados.quantidade_acessos.unwrap_or(2);
        if quantidade_acessos < 1 {
            return Err(AppError::validacao(
                "quantidade_acessos",
                "A quantidade de acessos não pode ser menor que um.",
            ));
        }

        // A vírgula decimal é aceita, mas texto não numérico precisa
        // barrar aqui; o padrão "0" só cobre campos deixados em branco.
        let valor_tabela = candidato_valor(&dados.valor_tabela);
        let valor_real = candidato_valor(&dados.valor_real);
        let valor_entrada = candidato_valor(&dados.valor_entrada);
        let valor_venda_avista = candidato_valor(&dados.valor_venda_avista);
        let valor_parcelas = candidato_valor(&dados.valor_parcelas);
        if !eh_numero(
            Some(&valor_real),
            Some(&valor_tabela),
            Some(&valor_entrada),
            Some(&valor_venda_avista),
            Some(&valor_parcelas),
        ) {
            return Err(AppError::validacao(
                "valores",
                "Algum valor não é um número. Verifique os valores da venda.",
            ));
        }
        if normaliza_para_zero(&valor_real) {
            return Err(AppError::validacao(
                "valor_real",
                "O Valor Real da Venda não pode ser zero ou vazio.",
            ));
        }

        let condicoes_venda = if dados.condicoes_venda.trim().is_empty() {
            "Nenhuma escolhida".to_string()
        } else {
            dados.condicoes_venda.clone()
        };

        let data_prestacao_inicial = if dados.data_prestacao_inicial.trim().is_empty() {
            agora.format("%Y-%m-%d").to_string()
        } else {
            dados.data_prestacao_inicial.clone()
        };

        let mut endereco = dados.endereco.clone();
        if endereco.estado.trim().is_empty() {
            endereco.estado = "FO".to_string();
        }

        let config_expediente = self.configs.fim_expediente().await?;
        let data_criacao = resolver_data_criacao(agora, config_expediente.as_ref());

        // O pós-vendas vem do cadastro do vendedor atribuído, nunca do
        // cliente.
        let perfil_vendedor = self.usuarios.buscar_vendedor(&dados.vendedor).await?;
        let posvendas = perfil_vendedor
            .as_ref()
            .and_then(|perfil| perfil.pos_vendas.clone())
            .unwrap_or_default();

        let mut venda = Venda {
            numero_da_venda: String::new(),
            usuario_id: dados.usuario_id,
            nome: dados.nome,
            nome_do_contato: dados.nome_do_contato,
            endereco,
            cep: dados.cep,
            cnpj_cpf: dados.cnpj_cpf,
            razao_social: dados.razao_social,
            inscricao_estadual_identidade: dados.inscricao_estadual_identidade,
            email: emails.join(", "),
            fones: fones.join(", "),
            produto,
            condicoes,
            condicoes_venda,
            valor_tabela,
            valor_real,
            valor_entrada,
            valor_venda_avista,
            valor_parcelas,
            data_prestacao_inicial,
            tipo_envio_boleto: "EMAIL".to_string(),
            tipo_remessa: dados.tipo_remessa,
            vendedor: dados.vendedor,
            fone_vendedor: dados.fone_vendedor,
            email_vendedor: dados.email_vendedor,
            posvendas: posvendas.clone(),
            status: StatusVenda::Aguardando,
            tipo_cliente,
            data_criacao,
            data_real: agora,
            obs: dados.obs,
            obs_vendas: dados.obs_vendas,
            caminho_arquivos: dados.caminho_arquivos,
            desconto_autorizado: dados.desconto_autorizado,
            desconto_live: false,
            motivo_desconto_live: String::new(),
            quantidade_acessos,
            logs: vec![RegistroLog::novo(agora, &ator.username, "Criação da venda")],
        };

        // Emissão do sequencial com repetição otimista: numa colisão o
        // número é recalculado; em qualquer outra falha o número emitido é
        // consumido e não reaproveitado.
        let prefixo = agora.format("%Y%m").to_string();
        let mut tentativa = 0;
        loop {
            venda.numero_da_venda = self.proximo_numero(&prefixo).await?;
            match self.vendas.inserir(&venda).await {
                Ok(()) => break,
                Err(AppError::NumeroVendaEmUso) if tentativa + 1 < TENTATIVAS_NUMERO => {
                    tentativa += 1;
                }
                Err(AppError::Armazenamento(fonte)) => {
                    return Err(AppError::FalhaPersistencia {
                        numero_da_venda: venda.numero_da_venda,
                        fonte,
                    });
                }
                Err(erro) => return Err(erro),
            }
        }

        self.enviar_email_da_venda(&venda, perfil_vendedor.as_ref().map(|p| p.email.as_str()), false)
            .await;

        let mut envolvidos = Vec::new();
        if let Some(perfil) = &perfil_vendedor {
            envolvidos.push(perfil.username.clone());
        }
        if !posvendas.is_empty() {
            envolvidos.push(posvendas);
        }
        envolvidos.push("admin".to_string());
        self.notificar(NovaNotificacao {
            tipo: "venda".to_string(),
            mensagem: format!("Venda {} cadastrada/atualizada.", venda.numero_da_venda),
            venda: Some(venda.clone()),
            envolvidos: deduplicar(envolvidos),
        })
        .await;

        Ok(venda)
    }

    /// Edita uma venda existente: portões de permissão e de transição,
    /// revalidação completa, merge da whitelist de campos, uma entrada nova
    /// de log e o fan-out de notificação recalculado pelo status final.
    pub async fn editar(
        &self,
        ator: &Usuario,
        dados: EdicaoVenda,
        agora: NaiveDateTime,
    ) -> Result<Venda, AppError> {
        let venda = self
            .vendas
            .buscar_por_numero(&dados.numero_da_venda)
            .await?
            .ok_or(AppError::VendaNaoEncontrada)?;

        // Status pedido, canonizado. Vazio conta como "não enviado"; vocábulo
        // desconhecido é rejeitado mais adiante, depois dos portões.
        let status_bruto = dados
            .status
            .as_deref()
            .map(str::trim)
            .filter(|raw| !raw.is_empty());
        let status_solicitado = status_bruto.and_then(StatusVenda::parse);

        // Portões de permissão sobre o status pedido, antes de qualquer
        // outra validação.
        if ator.tipo == TipoUsuario::Faturamento
            && matches!(
                status_solicitado,
                Some(StatusVenda::Refazer | StatusVenda::Aguardando | StatusVenda::Cancelada)
            )
        {
            return Err(AppError::SemPermissao);
        }
        if ator.tipo == TipoUsuario::Vendedor
            && matches!(
                status_solicitado,
                Some(StatusVenda::Aprovada | StatusVenda::Faturado | StatusVenda::Cancelada)
            )
        {
            return Err(AppError::SemPermissao);
        }

        if status_solicitado == Some(StatusVenda::Cancelada)
            && dados
                .obs_vendas
                .as_deref()
                .map(str::trim)
                .unwrap_or("")
                .is_empty()
        {
            return Err(AppError::validacao(
                "obs_vendas",
                "Adicione o motivo do cancelamento.",
            ));
        }

        if let Some(novo) = status_solicitado {
            if novo != venda.status && !venda.status.pode_transicionar_para(novo) {
                return Err(AppError::validacao(
                    "status",
                    format!("A venda não pode mudar de {} para {}.", venda.status, novo),
                ));
            }
        }

        let catalogo = self.produtos.listar().await?;

        let condicoes_merge = dados
            .condicoes
            .clone()
            .unwrap_or_else(|| venda.condicoes.clone());
        let condicoes_efetiva = if condicoes_merge.is_empty() {
            venda.condicoes.clone()
        } else {
            condicoes_merge
        };
        if !verifica_condicoes(&condicoes_efetiva, &catalogo) {
            return Err(AppError::validacao(
                "condicoes",
                format!("A condição {condicoes_efetiva} não está cadastrada."),
            ));
        }

        let tipo_cliente = match dados.tipo_cliente.as_deref() {
            Some(raw) => TipoCliente::parse(raw).ok_or_else(|| {
                AppError::validacao(
                    "tipo_cliente",
                    format!("O tipo de cliente {raw} não existe."),
                )
            })?,
            None => venda.tipo_cliente,
        };

        if let Some(raw) = status_bruto {
            if status_solicitado.is_none() {
                return Err(AppError::validacao(
                    "status",
                    format!("O Status da Venda {raw} não existe."),
                ));
            }
        }

        // Na edição a síntese também vale quando o produto já gravado é um
        // personalizado sendo "atualizado" com o campo registrado em
        // branco.
        let produto_base = dados
            .produto
            .clone()
            .unwrap_or_else(|| venda.produto.clone());
        let produto = if (produto_base.is_empty() || produto_base.starts_with("Personalizado"))
            && !dados.produtos_personalizados.trim().is_empty()
        {
            sintetiza_personalizado(&dados.produtos_personalizados)
        } else {
            produto_base
        };
        if !verifica_produto(&produto, &catalogo) {
            return Err(AppError::validacao(
                "produto",
                format!("O produto {produto} não está cadastrado."),
            ));
        }

        let quantidade_acessos = dados
            .quantidade_acessos
            .unwrap_or(venda.quantidade_acessos);
        if quantidade_acessos < 1 {
            return Err(AppError::validacao(
                "quantidade_acessos",
                "A quantidade de acessos não pode ser menor que 1.",
            ));
        }

        let valor_real = match &dados.valor_real {
            Some(valor) => normalizar_valor(valor, "0"),
            None => venda.valor_real.clone(),
        };
        if normaliza_para_zero(&valor_real) {
            return Err(AppError::validacao(
                "valor_real",
                "O Valor Real da Venda não pode ser zero ou vazio.",
            ));
        }

        let mut valor_entrada = match &dados.valor_entrada {
            Some(valor) => normalizar_valor(valor, "0"),
            None => venda.valor_entrada.clone(),
        };
        let mut valor_parcelas = dados
            .valor_parcelas
            .clone()
            .unwrap_or_else(|| venda.valor_parcelas.clone());
        // O valor de tabela sempre acompanha o formulário.
        let valor_tabela =
            normalizar_valor(&dados.valor_tabela.clone().unwrap_or_default(), "0");

        let condicoes_venda_merge = dados
            .condicoes_venda
            .clone()
            .unwrap_or_else(|| venda.condicoes_venda.clone());
        let condicoes_venda = if condicoes_venda_merge.is_empty() {
            venda.condicoes_venda.clone()
        } else {
            condicoes_venda_merge
        };

        // Regra cruzada da família 1+1: o preço à vista só existe quando a
        // condição é 1+1 paga à vista; em qualquer outro arranjo é zerado.
        let valor_venda_avista = if condicoes_efetiva == "A/C | 1+1" && condicoes_venda == "avista"
        {
            valor_parcelas = "0".to_string();
            valor_entrada = "0".to_string();
            normalizar_valor(&dados.valor_venda_avista.clone().unwrap_or_default(), "0")
        } else {
            "0".to_string()
        };

        if !eh_numero(
            Some(&valor_real),
            Some(&valor_tabela),
            Some(&valor_entrada),
            Some(&valor_venda_avista),
            Some(&valor_parcelas),
        ) {
            return Err(AppError::validacao(
                "valores",
                "Algum valor não é um número. Verifique os valores da venda.",
            ));
        }

        let status_final = status_solicitado.unwrap_or(venda.status);

        let mut atualizada = venda.clone();
        atualizada.nome = dados.nome.unwrap_or(venda.nome.clone());
        atualizada.nome_do_contato = dados.nome_do_contato.unwrap_or(venda.nome_do_contato.clone());
        atualizada.cep = dados.cep.unwrap_or(venda.cep.clone());
        atualizada.email = dados.email.unwrap_or(venda.email.clone());
        atualizada.fones = dados.fones.unwrap_or(venda.fones.clone());
        atualizada.cnpj_cpf = dados.cnpj_cpf.unwrap_or(venda.cnpj_cpf.clone());
        atualizada.razao_social = dados.razao_social.unwrap_or(venda.razao_social.clone());
        atualizada.inscricao_estadual_identidade = dados
            .inscricao_estadual_identidade
            .unwrap_or(venda.inscricao_estadual_identidade.clone());
        atualizada.endereco = Endereco {
            rua: dados.endereco_rua.unwrap_or(venda.endereco.rua.clone()),
            bairro: dados.endereco_bairro.unwrap_or(venda.endereco.bairro.clone()),
            numero: dados.endereco_numero.unwrap_or(venda.endereco.numero.clone()),
            cidade: dados.endereco_cidade.unwrap_or(venda.endereco.cidade.clone()),
            estado: dados.endereco_estado.unwrap_or(venda.endereco.estado.clone()),
        };
        atualizada.produto = produto;
        atualizada.condicoes = condicoes_efetiva;
        atualizada.condicoes_venda = condicoes_venda;
        atualizada.tipo_cliente = tipo_cliente;
        atualizada.status = status_final;
        atualizada.valor_tabela = valor_tabela;
        atualizada.valor_real = valor_real;
        atualizada.valor_entrada = valor_entrada;
        atualizada.valor_venda_avista = valor_venda_avista;
        atualizada.valor_parcelas = valor_parcelas;
        atualizada.data_prestacao_inicial = dados
            .data_prestacao_inicial
            .unwrap_or(venda.data_prestacao_inicial.clone());
        atualizada.tipo_remessa = dados.tipo_remessa.unwrap_or(venda.tipo_remessa.clone());
        atualizada.obs = dados.obs.unwrap_or(venda.obs.clone());
        atualizada.obs_vendas = dados.obs_vendas.unwrap_or(venda.obs_vendas.clone());
        atualizada.caminho_arquivos = dados
            .caminho_arquivos
            .unwrap_or(venda.caminho_arquivos.clone());
        atualizada.quantidade_acessos = quantidade_acessos;
        atualizada.desconto_autorizado = dados.desconto_autorizado.unwrap_or(false);
        atualizada.desconto_live = dados.desconto_live.unwrap_or(false);
        atualizada.motivo_desconto_live = dados.motivo_desconto_live.unwrap_or_default();

        let registro = RegistroLog::novo(agora, &ator.username, "Edição da venda");
        self.vendas.atualizar(&atualizada).await?;
        self.vendas
            .anexar_log(&atualizada.numero_da_venda, registro.clone())
            .await?;
        atualizada.logs.push(registro);

        let envolvidos = self.envolvidos_da_edicao(&atualizada, status_final).await?;
        self.notificar(NovaNotificacao {
            tipo: "venda".to_string(),
            mensagem: format!(
                "Venda {} editada. Status: {}",
                atualizada.numero_da_venda,
                capitalizar(status_final.descricao_legivel())
            ),
            venda: Some(atualizada.clone()),
            envolvidos,
        })
        .await;

        // Vendedor devolvendo a venda para Aguardando sinaliza reenvio do
        // pedido original. Admin na mesma transição não reenvia.
        if status_solicitado == Some(StatusVenda::Aguardando)
            && ator.tipo == TipoUsuario::Vendedor
        {
            self.enviar_email_da_venda(&atualizada, Some(&ator.email), true)
                .await;
        }

        Ok(atualizada)
    }

    /// Saldos do banco de desconto por vendedor na janela `[inicio, fim)`,
    /// considerando só vendas faturáveis (Aprovada e Faturado).
    pub async fn saldos_banco_desconto(
        &self,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
    ) -> Result<HashMap<String, SaldoBanco>, AppError> {
        let vendas = self
            .vendas
            .listar_periodo(inicio, fim, &[StatusVenda::Aprovada, StatusVenda::Faturado])
            .await?;
        let limites: HashMap<String, Decimal> = self
            .configs
            .limites_vendedores()
            .await?
            .into_iter()
            .map(|limite| (limite.vendedor_nome, limite.limite))
            .collect();
        Ok(calcular_saldos(&vendas, &limites))
    }

    async fn proximo_numero(&self, prefixo: &str) -> Result<String, AppError> {
        let ultimo = self.vendas.ultimo_numero_com_prefixo(prefixo).await?;
        let sequencia = ultimo
            .as_deref()
            .and_then(|numero| numero.strip_prefix(prefixo))
            .and_then(|resto| resto.parse::<u32>().ok())
            .unwrap_or(0)
            + 1;
        Ok(format!("{prefixo}{sequencia:04}"))
    }

    /// Conjunto de destinatários da notificação de edição: vendedor da
    /// venda, pós-vendas (um ou mais, separados por vírgula) e o canal
    /// "admin"; Faturado e Aprovada ampliam o conjunto por papel.
    async fn envolvidos_da_edicao(
        &self,
        venda: &Venda,
        status_final: StatusVenda,
    ) -> Result<Vec<String>, AppError> {
        let mut envolvidos = Vec::new();
        if let Some(perfil) = self.usuarios.buscar_vendedor(&venda.vendedor).await? {
            envolvidos.push(perfil.username);
        }
        envolvidos.extend(
            venda
                .posvendas
                .split(',')
                .map(str::trim)
                .filter(|pv| !pv.is_empty())
                .map(str::to_string),
        );
        envolvidos.push("admin".to_string());

        match status_final {
            StatusVenda::Faturado => {
                for tipo in [
                    TipoUsuario::Faturamento,
                    TipoUsuario::PosVendas,
                    TipoUsuario::Admin,
                ] {
                    for usuario in self.usuarios.listar_por_tipo(tipo).await? {
                        envolvidos.push(usuario.username);
                    }
                }
            }
            StatusVenda::Aprovada => {
                for usuario in self.usuarios.listar_por_tipo(TipoUsuario::Faturamento).await? {
                    envolvidos.push(usuario.username);
                }
            }
            _ => {}
        }

        Ok(deduplicar(envolvidos))
    }

    /// Efeito fire-and-forget: falha de e-mail nunca desfaz a escrita.
    async fn enviar_email_da_venda(
        &self,
        venda: &Venda,
        destinatario: Option<&str>,
        reenvio: bool,
    ) {
        let Some(destinatario) = destinatario else {
            warn!(
                numero_da_venda = %venda.numero_da_venda,
                "vendedor sem cadastro, e-mail da venda não enviado"
            );
            return;
        };
        let config = match self.configs.geral().await {
            Ok(Some(config)) => config,
            Ok(None) => {
                warn!("configuração geral ausente, e-mail da venda não enviado");
                return;
            }
            Err(erro) => {
                error!(%erro, "falha lendo a configuração geral de e-mail");
                return;
            }
        };
        let Some(email) = email_de_venda(venda, &config, destinatario, reenvio) else {
            warn!("nenhum remetente SMTP ativo, e-mail da venda não enviado");
            return;
        };
        if let Err(erro) = self.email.enviar(email).await {
            error!(
                numero_da_venda = %venda.numero_da_venda,
                %erro,
                "falha no envio do e-mail da venda"
            );
        }
    }

    async fn notificar(&self, notificacao: NovaNotificacao) {
        if let Err(erro) = self.notificador.registrar(notificacao).await {
            error!(%erro, "falha registrando a notificação da venda");
        }
    }
}

/// Prepara um valor monetário para a porta `eh_numero`: vírgula vira
/// ponto, campo em branco vira "0" e texto inconversível fica como está
/// para a porta rejeitar.
fn candidato_valor(valor: &str) -> String {
    let valor = valor.trim().replace(',', ".");
    if valor.is_empty() {
        "0".to_string()
    } else {
        valor
    }
}

fn sintetiza_personalizado(produtos_personalizados: &str) -> String {
    let lista: Vec<&str> = produtos_personalizados
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();
    format!("Personalizado: {}", lista.join(", "))
}

fn capitalizar(texto: &str) -> String {
    let mut letras = texto.chars();
    match letras.next() {
        Some(primeira) => primeira.to_uppercase().collect::<String>() + letras.as_str(),
        None => String::new(),
    }
}
