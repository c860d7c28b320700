use dex_viewer::{fetch_page, load_detail, Catalogue, CatalogueSource, FetchError, PageRequest, PokeApiClient};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> PokeApiClient {
    PokeApiClient::new(server.uri(), Duration::from_secs(5)).unwrap()
}

fn entry_json(server: &MockServer, id: u32, name: &str, types: &[(&str, u32)]) -> Value {
    let type_slots: Vec<Value> = types
        .iter()
        .enumerate()
        .map(|(slot, (type_name, type_id))| {
            json!({
                "slot": slot + 1,
                "type": { "name": type_name, "url": format!("{}/type/{}/", server.uri(), type_id) }
            })
        })
        .collect();

    json!({
        "id": id,
        "name": name,
        "types": type_slots,
        "abilities": [{ "ability": { "name": "blaze", "url": "" }, "is_hidden": false }],
        "height": 17,
        "weight": 905,
        "stats": [
            { "base_stat": 78, "effort": 0, "stat": { "name": "hp" } },
            { "base_stat": 109, "effort": 3, "stat": { "name": "special-attack" } }
        ]
    })
}

async fn mount_list(server: &MockServer, offset: &str, limit: &str, ids: &[u32]) {
    let results: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "name": format!("mon{}", id), "url": format!("{}/pokemon/{}/", server.uri(), id) }))
        .collect();

    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .and(query_param("limit", limit))
        .and(query_param("offset", offset))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "count": 1302, "results": results })))
        .mount(server)
        .await;
}

async fn mount_entry(server: &MockServer, route: String, body: Value) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_page_resolves_details_in_summary_order() {
    let server = MockServer::start().await;
    mount_list(&server, "0", "2", &[2, 1]).await;
    mount_entry(&server, "/pokemon/1/".to_string(), entry_json(&server, 1, "bulbasaur", &[("grass", 12)])).await;
    mount_entry(&server, "/pokemon/2/".to_string(), entry_json(&server, 2, "ivysaur", &[("grass", 12)])).await;
    let client = client_for(&server);

    let page = fetch_page(&client, PageRequest { offset: 0, limit: 2 }).await.unwrap();

    let ids: Vec<u32> = page.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(page[1].name, "bulbasaur");
    assert_eq!(page[1].types[0].url, format!("{}/type/12/", server.uri()));
}

#[tokio::test]
async fn test_failed_detail_commits_nothing() {
    let server = MockServer::start().await;
    mount_list(&server, "0", "2", &[1, 2]).await;
    mount_entry(&server, "/pokemon/1/".to_string(), entry_json(&server, 1, "bulbasaur", &[("grass", 12)])).await;
    Mock::given(method("GET"))
        .and(path("/pokemon/2/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let client = client_for(&server);
    let mut catalogue = Catalogue::new(2);

    let err = catalogue.fetch_next_page(&client).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 500, .. }));
    assert_eq!(catalogue.cursor().offset(), 0);
    assert!(catalogue.is_empty());
}

#[tokio::test]
async fn test_cursor_walks_pages() {
    let server = MockServer::start().await;
    mount_list(&server, "0", "1", &[1]).await;
    mount_list(&server, "1", "1", &[2]).await;
    mount_entry(&server, "/pokemon/1/".to_string(), entry_json(&server, 1, "bulbasaur", &[("grass", 12)])).await;
    mount_entry(&server, "/pokemon/2/".to_string(), entry_json(&server, 2, "ivysaur", &[("grass", 12)])).await;
    let client = client_for(&server);
    let mut catalogue = Catalogue::new(1);

    catalogue.fetch_next_page(&client).await.unwrap();
    catalogue.fetch_next_page(&client).await.unwrap();

    assert_eq!(catalogue.cursor().offset(), 2);
    assert_eq!(catalogue.entries().iter().map(|e| e.id).collect::<Vec<_>>(), vec![1, 2]);
}

#[tokio::test]
async fn test_malformed_list_is_a_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/pokemon"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = client.list_page(0, 10).await.unwrap_err();

    assert!(matches!(err, FetchError::Decode { .. }));
}

#[tokio::test]
async fn test_detail_with_shared_weakness() {
    let server = MockServer::start().await;
    mount_entry(
        &server,
        "/pokemon/6".to_string(),
        entry_json(&server, 6, "charizard", &[("fire", 10), ("flying", 3)]),
    )
    .await;
    mount_entry(
        &server,
        "/pokemon-species/6/".to_string(),
        json!({ "egg_groups": [{ "name": "monster" }, { "name": "dragon" }] }),
    )
    .await;
    mount_entry(
        &server,
        "/type/10/".to_string(),
        json!({ "damage_relations": { "double_damage_from": [
            { "name": "ground" }, { "name": "rock" }, { "name": "water" }
        ] } }),
    )
    .await;
    mount_entry(
        &server,
        "/type/3/".to_string(),
        json!({ "damage_relations": { "double_damage_from": [
            { "name": "electric" }, { "name": "ice" }, { "name": "rock" }
        ] } }),
    )
    .await;
    let client = client_for(&server);

    let detail = load_detail(&client, 6).await.unwrap();

    assert_eq!(detail.entry.name, "charizard");
    assert_eq!(detail.categories, vec!["monster", "dragon"]);
    assert_eq!(detail.weaknesses.iter().filter(|w| w.as_str() == "rock").count(), 1);
    assert_eq!(detail.weaknesses.len(), 5);
}

#[tokio::test]
async fn test_missing_species_fails_the_overlay() {
    let server = MockServer::start().await;
    mount_entry(&server, "/pokemon/6".to_string(), entry_json(&server, 6, "charizard", &[("fire", 10)])).await;
    mount_entry(
        &server,
        "/type/10/".to_string(),
        json!({ "damage_relations": { "double_damage_from": [{ "name": "water" }] } }),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/pokemon-species/6/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let client = client_for(&server);

    let err = load_detail(&client, 6).await.unwrap_err();

    assert!(matches!(err, FetchError::Status { status: 404, .. }));
    assert!(err.url().ends_with("/pokemon-species/6/"));
}
