pub mod memoria;

use async_trait::async_trait;
use chrono::NaiveDateTime;

use crate::{
    common::error::AppError,
    models::{ConfigGeral, FimExpediente, LimiteVendedor, Produto, RegistroLog, StatusVenda, TipoUsuario, Usuario, Venda},
};

/// Acesso à coleção de vendas. A tecnologia de armazenamento fica fora do
/// núcleo; estas são as únicas operações de que o ciclo de vida precisa.
#[async_trait]
pub trait VendaStore: Send + Sync {
    async fn buscar_por_numero(&self, numero: &str) -> Result<Option<Venda>, AppError>;

    /// Maior `numero_da_venda` já emitido com o prefixo `YYYYMM` dado.
    async fn ultimo_numero_com_prefixo(&self, prefixo: &str) -> Result<Option<String>, AppError>;

    /// Insere a venda. Deve falhar com `AppError::NumeroVendaEmUso` se o
    /// número já existir, para viabilizar o laço de repetição otimista.
    async fn inserir(&self, venda: &Venda) -> Result<(), AppError>;

    /// Regrava os campos do documento, preservando o log existente.
    async fn atualizar(&self, venda: &Venda) -> Result<(), AppError>;

    /// Acrescenta uma entrada ao log da venda de forma atômica no store
    /// (push no array, não releitura+regravação do documento inteiro).
    async fn anexar_log(&self, numero: &str, registro: RegistroLog) -> Result<(), AppError>;

    /// Vendas com `data_criacao` em `[inicio, fim)` cujo status está em
    /// `status` (janela usada pelo recálculo do banco de desconto).
    async fn listar_periodo(
        &self,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
        status: &[StatusVenda],
    ) -> Result<Vec<Venda>, AppError>;
}

#[async_trait]
pub trait UsuarioStore: Send + Sync {
    /// Busca um vendedor pelo nome completo ou pelo username.
    async fn buscar_vendedor(&self, nome: &str) -> Result<Option<Usuario>, AppError>;

    async fn listar_por_tipo(&self, tipo: TipoUsuario) -> Result<Vec<Usuario>, AppError>;
}

#[async_trait]
pub trait ProdutoStore: Send + Sync {
    /// Catálogo completo de produtos com suas formas de pagamento.
    async fn listar(&self) -> Result<Vec<Produto>, AppError>;
}

#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn fim_expediente(&self) -> Result<Option<FimExpediente>, AppError>;

    async fn geral(&self) -> Result<Option<ConfigGeral>, AppError>;

    async fn limites_vendedores(&self) -> Result<Vec<LimiteVendedor>, AppError>;
}
