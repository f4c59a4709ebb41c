//! End-to-end tests against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every client
//! operation over real HTTP through `LiveTransport`. Validates that request
//! building, the ureq transport and decoding agree with the server's wire
//! format, including its `null`-for-empty and blank-slot quirks.

use std::net::SocketAddr;
use std::time::Duration;

use fetch_core::decode::CodingPath;
use fetch_core::{
    ClientConfig, Decode, DecodeError, DecodeTarget, FetchError, KeyedContainer, LiveTransport,
    MealDbClient, MealSummary, RetryPolicy, TransportError,
};
use mock_server::API_PREFIX;
use serde_json::Value;

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn live_client(addr: SocketAddr) -> MealDbClient<LiveTransport> {
    let config = ClientConfig::new(&format!("http://{addr}{API_PREFIX}/")).unwrap();
    MealDbClient::new(LiveTransport::new(&config), config)
}

#[test]
fn browse_lifecycle() {
    let client = live_client(start_server());

    // Step 1: categories.
    let categories = client.fetch_categories().unwrap();
    let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Beef", "Chicken", "Seafood"]);

    // Step 2: list one category.
    let seafood = client.fetch_list("Seafood").unwrap();
    let ids: Vec<&str> = seafood.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids, vec!["52959", "52887"]);

    // Step 3: unknown category comes back as `null`, decoded as empty.
    assert!(client.fetch_list("Dessert").unwrap().is_empty());

    // Step 4: detail for each listed meal.
    let kedgeree = client.fetch_detail("52887").unwrap().expect("kedgeree exists");
    assert_eq!(kedgeree.name, "Kedgeree");
    assert_eq!(kedgeree.tags, vec!["Fish", "Breakfast", "DateNight"]);
    let ingredients: Vec<&str> = kedgeree.ingredients.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(
        ingredients,
        vec!["Smoked Haddock", "Bay Leaves", "Milk", "Eggs", "Basmati Rice"]
    );
    assert_eq!(kedgeree.ingredients[2].measure.as_deref(), Some("300ml"));
    assert_eq!(kedgeree.youtube, None);

    let teriyaki = client.fetch_detail("52772").unwrap().unwrap();
    assert_eq!(teriyaki.ingredients.len(), 9);
    assert_eq!(teriyaki.ingredients[8].name, "brown rice");

    // Step 5: unknown id is absent, not an error.
    assert_eq!(client.fetch_detail("1").unwrap(), None);

    // Step 6: search with characters that need encoding.
    let found = client.search("salmon with fennel &").unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "52959");
    assert!(client.search("pizza").unwrap().is_empty());

    // Step 7: random is served from the catalog.
    let random = client.fetch_random().unwrap();
    assert_eq!(random.id, "52772");
}

#[test]
fn repeated_fetches_are_identical() {
    let client = live_client(start_server());

    let first = client.fetch_detail("52959").unwrap();
    let second = client.fetch_detail("52959").unwrap();
    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

/// A caller-defined target: the `filter.php` envelope decoded in one step.
struct FilterEnvelope {
    meals: Vec<MealSummary>,
}

impl Decode for FilterEnvelope {
    fn target() -> DecodeTarget {
        DecodeTarget::Keyed
    }

    fn decode(value: &Value, path: &CodingPath) -> Result<Self, DecodeError> {
        let c = KeyedContainer::new(value, path)?;
        Ok(FilterEnvelope {
            meals: c.optional("meals")?.unwrap_or_default(),
        })
    }
}

#[test]
fn generic_fetch_decodes_caller_types() {
    let client = live_client(start_server());

    let request = client.build_list("Chicken").unwrap();
    let envelope = client.fetch::<FilterEnvelope>(&request).unwrap();
    assert_eq!(envelope.meals.len(), 1);
    assert_eq!(envelope.meals[0].name, "Teriyaki Chicken Casserole");
}

#[test]
fn generic_fetch_checks_target_shape() {
    let client = live_client(start_server());

    let request = client.build_list("Chicken").unwrap();
    let err = client.fetch::<Vec<MealSummary>>(&request).unwrap_err();
    // The body is an envelope object, not a bare list.
    assert!(
        matches!(err, FetchError::Decode(DecodeError::TypeMismatch { expected: "array", .. })),
        "got {err:?}"
    );
}

#[test]
fn unknown_route_is_http_error() {
    let client = live_client(start_server());

    let request = client.request("latest.php").build().unwrap();
    let err = client.fetch::<Vec<MealSummary>>(&request).unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 404, .. }), "got {err:?}");
}

#[test]
fn slow_response_times_out() {
    let client = live_client(start_server());

    let request = client
        .request("slow.php")
        .query("ms", "2000")
        .timeout(Duration::from_millis(100))
        .build()
        .unwrap();
    let err = client.send(&request).unwrap_err();
    assert_eq!(err, FetchError::Transport(TransportError::Timeout));
}

#[test]
fn unreachable_server_is_connection_failure() {
    // Bind then drop to get a port with nothing listening.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let client = live_client(addr);

    let err = client.fetch_categories().unwrap_err();
    assert!(
        matches!(err, FetchError::Transport(TransportError::ConnectionFailed(_))),
        "got {err:?}"
    );
}

#[test]
fn oversized_body_is_rejected_once() {
    let addr = start_server();
    let config = ClientConfig::new(&format!("http://{addr}{API_PREFIX}/"))
        .unwrap()
        .with_max_body_size(16);
    let client = MealDbClient::new(LiveTransport::new(&config), config)
        .with_retry(RetryPolicy::new(3).with_backoff(Duration::from_millis(1)));

    let err = client.fetch_categories().unwrap_err();
    assert!(
        matches!(err, FetchError::Transport(TransportError::InvalidRequest(_))),
        "got {err:?}"
    );
}

#[test]
fn caller_built_agent_is_used_as_is() {
    let addr = start_server();
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();
    let config = ClientConfig::new(&format!("http://{addr}{API_PREFIX}/"))
        .unwrap()
        .with_user_agent("meal-planner/2.1");
    let client = MealDbClient::new(LiveTransport::from_agent(agent), config);

    assert_eq!(client.fetch_categories().unwrap().len(), 3);
    let request = client.build_random().unwrap();
    assert_eq!(request.headers().get("user-agent"), Some("meal-planner/2.1"));
    let err = client
        .fetch::<Vec<MealSummary>>(&client.request("latest.php").build().unwrap())
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 404, .. }), "got {err:?}");
}
