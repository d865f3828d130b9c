//! Remote service integration tests
//!
//! Exercises the HTTP client against a throwaway local responder and checks
//! every failure path ends in a usable local result.

use monster_arena::battle::ai::*;
use monster_arena::battle::CooldownTable;
use monster_arena::core::config::{ArenaConfig, ServiceConfig};
use monster_arena::core::error::ArenaError;
use monster_arena::monster::*;
use monster_arena::service::{DecisionService, MonsterService, ServiceClient};

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// Serve `body` with `status` to every connection, returning the base URL
async fn canned_responder(status: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 8192];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });
    format!("http://{}", addr)
}

fn service_config(base: &str) -> ServiceConfig {
    ServiceConfig {
        enabled: true,
        decision_url: format!("{}/api/opponent-move", base),
        generation_url: format!("{}/api/generate-monster", base),
        timeout_ms: 2000,
    }
}

fn arena_config(base: &str, seed: u64) -> ArenaConfig {
    ArenaConfig {
        service: service_config(base),
        seed: Some(seed),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_remote_decision_over_http() {
    let base = canned_responder(
        "200 OK",
        r#"{"ability": "Earthquake", "narration": "Terra stomps the ground!", "reasoning": "pressing the advantage"}"#,
    )
    .await;
    let mut engine = OpponentEngine::from_config(&arena_config(&base, 1)).unwrap();
    assert!(engine.has_remote());

    let tank = MonsterInstance::from_archetype(Archetype::Tank);
    let striker = MonsterInstance::from_archetype(Archetype::Striker);
    let cooldowns = CooldownTable::new();
    let ctx = DecisionContext::new(&tank, &striker, Personality::Aggressive, &cooldowns, None, 1);

    let decision = engine.decide_move(&ctx).await;
    assert_eq!(decision.source, DecisionSource::Remote);
    assert_eq!(decision.ability.id, "earthquake");
    assert_eq!(decision.narration, "Terra stomps the ground!");
}

#[tokio::test]
async fn test_server_error_falls_back() {
    let base = canned_responder("500 Internal Server Error", r#"{"error": "boom"}"#).await;
    let client = ServiceClient::new(&service_config(&base)).unwrap();

    let tank = MonsterInstance::from_archetype(Archetype::Tank);
    let striker = MonsterInstance::from_archetype(Archetype::Striker);
    let cooldowns = CooldownTable::new();
    let ctx = DecisionContext::new(&tank, &striker, Personality::Cautious, &cooldowns, None, 1);

    let direct = client.request_decision(&DecisionRequest::from_context(&ctx)).await;
    assert!(matches!(direct, Err(ArenaError::Service(_))));

    let mut engine = OpponentEngine::with_service(client, &arena_config(&base, 2));
    let decision = engine.decide_move(&ctx).await;
    assert_eq!(decision.source, DecisionSource::Policy);
    assert!(tank.ability(&decision.ability.id).is_some());
}

#[tokio::test]
async fn test_garbage_body_is_malformed() {
    let base = canned_responder("200 OK", "this is not json").await;
    let client = ServiceClient::new(&service_config(&base)).unwrap();
    let result = client.generate(Archetype::Speedster).await;
    assert!(matches!(result, Err(ArenaError::MalformedResponse(_))));
}

#[tokio::test]
async fn test_unreachable_service_falls_back() {
    let base = "http://127.0.0.1:9";
    let mut engine = OpponentEngine::from_config(&arena_config(base, 3)).unwrap();

    let volt = MonsterInstance::from_archetype(Archetype::Speedster);
    let blaze = MonsterInstance::from_archetype(Archetype::Striker);
    let mut cooldowns = CooldownTable::new();
    cooldowns.start(&volt.abilities[1]);
    let ctx = DecisionContext::new(&volt, &blaze, Personality::Adaptive, &cooldowns, Some("Inferno Blast"), 2);

    let decision = engine.decide_move(&ctx).await;
    assert_eq!(decision.source, DecisionSource::Policy);
    assert_eq!(decision.ability.id, "thunder_dash");
    assert!(!decision.narration.is_empty());
    assert!(!decision.reasoning.is_empty());
}

#[tokio::test]
async fn test_generation_over_http_backfills() {
    let base = canned_responder(
        "200 OK",
        r#"{"name": "Granithor", "maxHP": 0, "abilities": [
            {"name": "Iron Defense", "type": "DEFENSIVE", "block": 25, "cooldown": 1},
            {"id": "ground_pound", "name": "Ground Pound", "damage": 38, "cooldown": 2, "type": "SPECIAL"}
        ]}"#,
    )
    .await;
    let client = ServiceClient::new(&service_config(&base)).unwrap();
    let monster = generate_monster(&client, Archetype::Tank).await;

    assert!(monster.generated);
    assert_eq!(monster.name, "Granithor");
    // Non-positive HP comes from the template
    assert_eq!(monster.max_hp, 120);
    assert_eq!(monster.hp, 120);
    assert_eq!(monster.icon, lookup_template(Archetype::Tank).icon);
    assert_eq!(monster.abilities[0].id, "iron_defense");
    assert_eq!(monster.abilities[0].shield(), Some(25));
    assert_eq!(monster.abilities[1].damage, 38);
}

#[tokio::test]
async fn test_generation_unreachable_uses_template() {
    let client = ServiceClient::new(&service_config("http://127.0.0.1:9")).unwrap();
    let monster = generate_monster(&client, Archetype::Striker).await;
    assert!(!monster.generated);
    assert_eq!(monster, MonsterInstance::from_archetype(Archetype::Striker));
}
