//! Núcleo de regras de negócio do sistema de gestão de vendas.
//!
//! Cobre o ciclo de vida da venda (criação, edição, máquina de status com
//! permissões por papel), a normalização de valores monetários, os
//! validadores de catálogo, a política de expediente que decide a
//! `data_criacao` efetiva e o recálculo do banco de desconto por vendedor.
//!
//! Armazenamento, HTTP e transporte de e-mail são colaboradores externos,
//! expressos pelas traits de [`db`].

pub mod common;
pub mod db;
pub mod models;
pub mod services;

pub use common::error::AppError;
pub use services::venda_service::VendaService;
