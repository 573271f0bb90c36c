pub mod venda;
pub use venda::{Endereco, RegistroLog, StatusVenda, TipoCliente, Venda};
pub mod usuario;
pub use usuario::{TipoUsuario, Usuario};
pub mod produto;
pub use produto::{FormaPagamento, Produto};
pub mod configs;
pub use configs::{ConfigGeral, CredencialEmail, FimExpediente, LimiteVendedor};
