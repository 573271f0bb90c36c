// src/db/memoria.rs
//
// Implementações em memória dos colaboradores externos. Servem de backend
// de referência e de harness para a suíte de testes; a tecnologia real de
// armazenamento fica fora deste núcleo.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use tokio::sync::{Mutex, RwLock};

use crate::common::error::AppError;
use crate::db::{ConfigStore, ProdutoStore, UsuarioStore, VendaStore};
use crate::models::{
    ConfigGeral, FimExpediente, LimiteVendedor, Produto, RegistroLog, StatusVenda, TipoUsuario,
    Usuario, Venda,
};
use crate::services::email_venda::{Email, TransporteEmail};
use crate::services::notificacao::{Notificacao, Notificador, NovaNotificacao};

#[derive(Default)]
pub struct MemoriaVendas {
    vendas: RwLock<BTreeMap<String, Venda>>,
}

impl MemoriaVendas {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn total(&self) -> usize {
        self.vendas.read().await.len()
    }
}

#[async_trait]
impl VendaStore for MemoriaVendas {
    async fn buscar_por_numero(&self, numero: &str) -> Result<Option<Venda>, AppError> {
        Ok(self.vendas.read().await.get(numero).cloned())
    }

    async fn ultimo_numero_com_prefixo(&self, prefixo: &str) -> Result<Option<String>, AppError> {
        let vendas = self.vendas.read().await;
        Ok(vendas
            .range(prefixo.to_string()..)
            .take_while(|(numero, _)| numero.starts_with(prefixo))
            .map(|(numero, _)| numero.clone())
            .last())
    }

    async fn inserir(&self, venda: &Venda) -> Result<(), AppError> {
        let mut vendas = self.vendas.write().await;
        if vendas.contains_key(&venda.numero_da_venda) {
            return Err(AppError::NumeroVendaEmUso);
        }
        vendas.insert(venda.numero_da_venda.clone(), venda.clone());
        Ok(())
    }

    async fn atualizar(&self, venda: &Venda) -> Result<(), AppError> {
        let mut vendas = self.vendas.write().await;
        match vendas.get_mut(&venda.numero_da_venda) {
            Some(existente) => {
                // O log é mantido pelo store; `anexar_log` é o único caminho
                // que o altera.
                let logs = std::mem::take(&mut existente.logs);
                *existente = venda.clone();
                existente.logs = logs;
                Ok(())
            }
            None => Err(AppError::VendaNaoEncontrada),
        }
    }

    async fn anexar_log(&self, numero: &str, registro: RegistroLog) -> Result<(), AppError> {
        let mut vendas = self.vendas.write().await;
        match vendas.get_mut(numero) {
            Some(venda) => {
                venda.logs.push(registro);
                Ok(())
            }
            None => Err(AppError::VendaNaoEncontrada),
        }
    }

    async fn listar_periodo(
        &self,
        inicio: NaiveDateTime,
        fim: NaiveDateTime,
        status: &[StatusVenda],
    ) -> Result<Vec<Venda>, AppError> {
        let vendas = self.vendas.read().await;
        Ok(vendas
            .values()
            .filter(|venda| venda.data_criacao >= inicio && venda.data_criacao < fim)
            .filter(|venda| status.contains(&venda.status))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoriaUsuarios {
    usuarios: RwLock<Vec<Usuario>>,
}

impl MemoriaUsuarios {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn cadastrar(&self, usuario: Usuario) {
        self.usuarios.write().await.push(usuario);
    }
}

#[async_trait]
impl UsuarioStore for MemoriaUsuarios {
    async fn buscar_vendedor(&self, nome: &str) -> Result<Option<Usuario>, AppError> {
        let usuarios = self.usuarios.read().await;
        Ok(usuarios
            .iter()
            .find(|usuario| {
                usuario.tipo == TipoUsuario::Vendedor
                    && (usuario.nome_completo == nome || usuario.username == nome)
            })
            .cloned())
    }

    async fn listar_por_tipo(&self, tipo: TipoUsuario) -> Result<Vec<Usuario>, AppError> {
        let usuarios = self.usuarios.read().await;
        Ok(usuarios
            .iter()
            .filter(|usuario| usuario.tipo == tipo)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct MemoriaProdutos {
    produtos: RwLock<Vec<Produto>>,
}

impl MemoriaProdutos {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn cadastrar(&self, produto: Produto) {
        self.produtos.write().await.push(produto);
    }
}

#[async_trait]
impl ProdutoStore for MemoriaProdutos {
    async fn listar(&self) -> Result<Vec<Produto>, AppError> {
        Ok(self.produtos.read().await.clone())
    }
}

#[derive(Default)]
pub struct MemoriaConfigs {
    fim_expediente: RwLock<Option<FimExpediente>>,
    geral: RwLock<Option<ConfigGeral>>,
    limites: RwLock<Vec<LimiteVendedor>>,
}

impl MemoriaConfigs {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn definir_fim_expediente(&self, config: FimExpediente) {
        *self.fim_expediente.write().await = Some(config);
    }

    pub async fn definir_geral(&self, config: ConfigGeral) {
        *self.geral.write().await = Some(config);
    }

    pub async fn definir_limite(&self, limite: LimiteVendedor) {
        self.limites.write().await.push(limite);
    }
}

#[async_trait]
impl ConfigStore for MemoriaConfigs {
    async fn fim_expediente(&self) -> Result<Option<FimExpediente>, AppError> {
        Ok(self.fim_expediente.read().await.clone())
    }

    async fn geral(&self) -> Result<Option<ConfigGeral>, AppError> {
        Ok(self.geral.read().await.clone())
    }

    async fn limites_vendedores(&self) -> Result<Vec<LimiteVendedor>, AppError> {
        Ok(self.limites.read().await.clone())
    }
}

/// Transporte que apenas guarda os e-mails enviados (harness de teste e
/// equivalente do endpoint de teste de e-mail do sistema).
#[derive(Default)]
pub struct TransporteEmailMemoria {
    enviados: Mutex<Vec<Email>>,
}

impl TransporteEmailMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn enviados(&self) -> Vec<Email> {
        self.enviados.lock().await.clone()
    }
}

#[async_trait]
impl TransporteEmail for TransporteEmailMemoria {
    async fn enviar(&self, email: Email) -> Result<(), AppError> {
        self.enviados.lock().await.push(email);
        Ok(())
    }
}

/// Consumidor de notificações que persiste em memória, espelhando a coleção
/// de notificações do sistema.
#[derive(Default)]
pub struct NotificadorMemoria {
    registros: Mutex<Vec<Notificacao>>,
}

impl NotificadorMemoria {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn registros(&self) -> Vec<Notificacao> {
        self.registros.lock().await.clone()
    }
}

#[async_trait]
impl Notificador for NotificadorMemoria {
    async fn registrar(&self, notificacao: NovaNotificacao) -> Result<(), AppError> {
        let registro = Notificacao {
            tipo: notificacao.tipo,
            mensagem: notificacao.mensagem,
            data_hora: chrono::Local::now().naive_local(),
            lida_por: Vec::new(),
            venda_numero: notificacao
                .venda
                .as_ref()
                .map(|venda| venda.numero_da_venda.clone()),
            envolvidos: notificacao.envolvidos,
        };
        self.registros.lock().await.push(registro);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::venda_service::tests_support::venda_exemplo;

    #[tokio::test]
    async fn inserir_rejeita_numero_repetido() {
        let store = MemoriaVendas::new();
        let venda = venda_exemplo();
        store.inserir(&venda).await.unwrap();
        assert!(matches!(
            store.inserir(&venda).await,
            Err(AppError::NumeroVendaEmUso)
        ));
    }

    #[tokio::test]
    async fn ultimo_numero_respeita_o_prefixo() {
        let store = MemoriaVendas::new();
        for numero in ["2024050003", "2024060001", "2024060007"] {
            let mut venda = venda_exemplo();
            venda.numero_da_venda = numero.to_string();
            store.inserir(&venda).await.unwrap();
        }
        assert_eq!(
            store.ultimo_numero_com_prefixo("202406").await.unwrap(),
            Some("2024060007".to_string())
        );
        assert_eq!(store.ultimo_numero_com_prefixo("202407").await.unwrap(), None);
    }

    #[tokio::test]
    async fn atualizar_preserva_o_log_do_store() {
        let store = MemoriaVendas::new();
        let venda = venda_exemplo();
        store.inserir(&venda).await.unwrap();

        let agora = chrono::Local::now().naive_local();
        store
            .anexar_log(&venda.numero_da_venda, RegistroLog::novo(agora, "maria", "Edição da venda"))
            .await
            .unwrap();

        let mut editada = venda.clone();
        editada.obs = "nova observação".into();
        editada.logs.clear(); // o chamador não controla o log pelo `atualizar`
        store.atualizar(&editada).await.unwrap();

        let gravada = store
            .buscar_por_numero(&venda.numero_da_venda)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(gravada.obs, "nova observação");
        assert_eq!(gravada.logs.len(), venda.logs.len() + 1);
    }
}
