pub mod valores;
pub mod validacao;
pub mod expediente;
pub mod banco_desconto;
pub mod email_venda;
pub mod notificacao;
pub mod venda_service;
pub use venda_service::VendaService;
