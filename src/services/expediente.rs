// src/services/expediente.rs
//
// Política que decide a `data_criacao` efetiva de uma venda nova. Vendas
// lançadas depois do fim do expediente (ou no fim de semana) são empurradas
// para o próximo dia útil, para que os relatórios por período reflitam os
// dias realmente trabalhados; `data_real` fica intocada com o instante
// verdadeiro da submissão.

use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::models::FimExpediente;

/// Horário limite de fallback quando o operador não fecha o dia
/// explicitamente.
const HORA_PADRAO_FECHAMENTO: &str = "18:15:00";

/// Resolve a data de criação efetiva a partir de "agora" e da configuração
/// de fim de expediente. Qualquer falha de interpretação da configuração
/// (documento ausente, hora malformada) cai para `agora` como está: a
/// política nunca pode impedir o cadastro de uma venda.
pub fn resolver_data_criacao(agora: NaiveDateTime, config: Option<&FimExpediente>) -> NaiveDateTime {
    match calcular(agora, config) {
        Some(data_criacao) => data_criacao,
        None => {
            tracing::warn!("configuração de fim de expediente ausente ou inválida; usando o instante atual");
            agora
        }
    }
}

fn calcular(agora: NaiveDateTime, config: Option<&FimExpediente>) -> Option<NaiveDateTime> {
    let config = config?;

    let hora_atual = agora.time();
    let hora_config = NaiveTime::parse_from_str(&config.hora, "%H:%M:%S").ok()?;
    let hora_padrao = NaiveTime::parse_from_str(HORA_PADRAO_FECHAMENTO, "%H:%M:%S").ok()?;

    // O operador fechou o expediente de HOJE explicitamente?
    let fechamento_eh_hoje = config
        .data
        .as_deref()
        .and_then(|data| NaiveDate::parse_from_str(data, "%d/%m/%Y").ok())
        .map(|data| data == agora.date())
        .unwrap_or(false);

    let resultado = match agora.weekday() {
        Weekday::Sat => {
            if config.trabalha_sabado {
                agora
            } else {
                madrugada(agora, 2)
            }
        }

        // Domingo rola para segunda independentemente da flag de sábado.
        Weekday::Sun => madrugada(agora, 1),

        Weekday::Fri => {
            let passou_do_fechamento = if fechamento_eh_hoje {
                hora_atual > hora_config || hora_atual > hora_padrao
            } else {
                hora_atual > hora_padrao
            };
            if passou_do_fechamento {
                if config.trabalha_sabado {
                    madrugada(agora, 1)
                } else {
                    madrugada(agora, 3)
                }
            } else {
                agora
            }
        }

        // Segunda a quinta: antes do fechamento fica hoje, depois vai para
        // a madrugada de amanhã.
        _ => {
            let dentro_do_expediente = if fechamento_eh_hoje {
                hora_atual < hora_config && hora_atual < hora_padrao
            } else {
                hora_atual < hora_padrao
            };
            if dentro_do_expediente {
                agora
            } else {
                madrugada(agora, 1)
            }
        }
    };

    Some(resultado)
}

// Meia-noite de `dias` à frente.
fn madrugada(agora: NaiveDateTime, dias: u64) -> NaiveDateTime {
    agora
        .checked_add_days(Days::new(dias))
        .unwrap_or(agora + Duration::days(dias as i64))
        .date()
        .and_time(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn em(data_hora: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(data_hora, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn config(data: Option<&str>, hora: &str, trabalha_sabado: bool) -> FimExpediente {
        FimExpediente {
            data: data.map(str::to_string),
            hora: hora.to_string(),
            trabalha_sabado,
        }
    }

    #[test]
    fn terca_de_manha_fica_como_esta() {
        // 2024-06-04 é uma terça-feira
        let agora = em("2024-06-04 09:00:00");
        let cfg = config(None, "18:00:00", false);
        assert_eq!(resolver_data_criacao(agora, Some(&cfg)), agora);
    }

    #[test]
    fn terca_depois_do_fallback_vai_para_quarta() {
        let agora = em("2024-06-04 19:00:00");
        let cfg = config(None, "18:00:00", false);
        assert_eq!(resolver_data_criacao(agora, Some(&cfg)), em("2024-06-05 00:00:00"));
    }

    #[test]
    fn fechamento_explicito_antecipa_o_corte() {
        // Fechamento de hoje às 16h: 16:30 já é amanhã, mesmo antes das 18:15.
        let agora = em("2024-06-04 16:30:00");
        let cfg = config(Some("04/06/2024"), "16:00:00", false);
        assert_eq!(resolver_data_criacao(agora, Some(&cfg)), em("2024-06-05 00:00:00"));
    }

    #[test]
    fn fechamento_explicito_de_outro_dia_eh_ignorado() {
        let agora = em("2024-06-04 16:30:00");
        let cfg = config(Some("03/06/2024"), "16:00:00", false);
        assert_eq!(resolver_data_criacao(agora, Some(&cfg)), agora);
    }

    #[test]
    fn domingo_sempre_rola_para_segunda() {
        // 2024-06-02 é domingo
        let agora = em("2024-06-02 15:00:00");
        for trabalha_sabado in [false, true] {
            let cfg = config(None, "18:00:00", trabalha_sabado);
            let resolvido = resolver_data_criacao(agora, Some(&cfg));
            assert_eq!(resolvido, em("2024-06-03 00:00:00"));
            assert_eq!(resolvido.weekday(), Weekday::Mon);
        }
    }

    #[test]
    fn sabado_depende_da_flag() {
        // 2024-06-01 é sábado
        let agora = em("2024-06-01 10:00:00");
        let com_sabado = config(None, "18:00:00", true);
        assert_eq!(resolver_data_criacao(agora, Some(&com_sabado)), agora);

        let sem_sabado = config(None, "18:00:00", false);
        assert_eq!(resolver_data_criacao(agora, Some(&sem_sabado)), em("2024-06-03 00:00:00"));
    }

    #[test]
    fn sexta_tarde_rola_para_segunda_ou_sabado() {
        // 2024-06-07 é sexta-feira
        let agora = em("2024-06-07 19:00:00");
        let sem_sabado = config(None, "18:00:00", false);
        assert_eq!(resolver_data_criacao(agora, Some(&sem_sabado)), em("2024-06-10 00:00:00"));

        let com_sabado = config(None, "18:00:00", true);
        assert_eq!(resolver_data_criacao(agora, Some(&com_sabado)), em("2024-06-08 00:00:00"));
    }

    #[test]
    fn sexta_com_fechamento_explicito_passa_por_qualquer_um_dos_cortes() {
        // Fechamento configurado às 20h, mas o fallback 18:15 já passou.
        let agora = em("2024-06-07 18:30:00");
        let cfg = config(Some("07/06/2024"), "20:00:00", false);
        assert_eq!(resolver_data_criacao(agora, Some(&cfg)), em("2024-06-10 00:00:00"));
    }

    #[test]
    fn configuracao_ausente_ou_malformada_cai_para_agora() {
        let agora = em("2024-06-02 15:00:00"); // domingo
        assert_eq!(resolver_data_criacao(agora, None), agora);

        let cfg = config(None, "meia-noite", false);
        assert_eq!(resolver_data_criacao(agora, Some(&cfg)), agora);
    }
}
