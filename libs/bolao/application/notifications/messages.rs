//! Notification texts (pt-BR)

use crate::domain::{
    MatchStatusUpdate, Notification, NotificationKind, RankingPlacement, RankingTopN,
    RoundBetsStatus,
};
use serde_json::json;

pub fn round_bets(status: &RoundBetsStatus) -> Notification {
    let data = json!({
        "round": status.round,
        "allowsNewBets": status.allows_new_bets,
        "isBlocked": status.is_blocked,
    });

    if status.allows_new_bets {
        return Notification {
            title: format!("Rodada {} liberada", status.round),
            body: format!(
                "A rodada {} está aceitando apostas. Faça seus palpites!",
                status.round
            ),
            kind: NotificationKind::RoundBetsOpen,
            data,
        };
    }

    let body = if status.is_blocked {
        format!(
            "As apostas da rodada {} foram bloqueadas automaticamente 30 minutos antes do início da primeira partida.",
            status.round
        )
    } else {
        format!(
            "As apostas da rodada {} foram encerradas pela administração.",
            status.round
        )
    };

    Notification {
        title: format!("Rodada {} bloqueada", status.round),
        body,
        kind: NotificationKind::RoundBetsClosed,
        data,
    }
}

fn match_data(update: &MatchStatusUpdate) -> serde_json::Value {
    json!({
        "matchId": update.match_id,
        "status": update.status,
        "homeTeam": update.home_team,
        "awayTeam": update.away_team,
        "round": update.round,
        "homeScore": update.home_score,
        "awayScore": update.away_score,
    })
}

pub fn match_started(update: &MatchStatusUpdate) -> Notification {
    Notification {
        title: "Partida iniciada".to_string(),
        body: format!(
            "{} x {} começou! (Rodada {})",
            update.home_team, update.away_team, update.round
        ),
        kind: NotificationKind::MatchStarted,
        data: match_data(update),
    }
}

pub fn match_finished(update: &MatchStatusUpdate) -> Notification {
    let body = match (update.home_score, update.away_score) {
        (Some(home), Some(away)) => format!(
            "Fim de jogo: {} {} x {} {} (Rodada {})",
            update.home_team, home, away, update.away_team, update.round
        ),
        _ => format!(
            "Fim de jogo: {} x {} (Rodada {})",
            update.home_team, update.away_team, update.round
        ),
    };

    Notification {
        title: "Partida encerrada".to_string(),
        body,
        kind: NotificationKind::MatchFinished,
        data: match_data(update),
    }
}

pub fn ranking_winner(placement: &RankingPlacement) -> Notification {
    Notification {
        title: format!("Você venceu a rodada {}!", placement.round),
        body: format!(
            "Seu bilhete #{} ficou em {}º lugar com {} pontos. Parabéns!",
            placement.ticket_id, placement.position, placement.points
        ),
        kind: NotificationKind::RankingWinner,
        data: json!({
            "round": placement.round,
            "ticketId": placement.ticket_id,
            "position": placement.position,
            "points": placement.points,
        }),
    }
}

pub fn ranking_top_n(placement: &RankingTopN) -> Notification {
    Notification {
        title: format!("Você está no top {}!", placement.top_n),
        body: format!(
            "Seu bilhete #{} ficou em {}º lugar na rodada {} com {} pontos.",
            placement.ticket_id, placement.position, placement.round, placement.points
        ),
        kind: NotificationKind::RankingTopN,
        data: json!({
            "round": placement.round,
            "ticketId": placement.ticket_id,
            "position": placement.position,
            "points": placement.points,
            "topN": placement.top_n,
        }),
    }
}
