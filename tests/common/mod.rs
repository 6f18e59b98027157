use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde_json::{json, Value};

use polylookup::lookup::{FetchError, Fetched, MarketDataSource, QuerySpec, Resolver};

pub const EVENT_ID: u64 = 23246;
pub const EVENT_SLUG: &str = "new-york-city-mayoral-election";

pub const ADAMS_ID: u64 = 538928;
pub const ADAMS_SLUG: &str = "will-eric-adams-win-the-2025-nyc-mayoral-election";
pub const ADAMS_CONDITION_ID: &str =
    "0x201df9b6a68bab220392ca4cd18cf4d8c96b7612568777626292d2fb08954efe";
pub const ADAMS_QUESTION_ID: &str =
    "0x5ddb6cc9bcce2d9d810ef66a6ee394f91ecf28b7caa4e405036af1916b26e805";
pub const ADAMS_YES_TOKEN: &str =
    "16867679388416061053995436140492438650416184687930130083732571696309100575009";
pub const ADAMS_NO_TOKEN: &str =
    "33092966384136390575358834096442566127433339424452612962698898396862096455733";

pub const MAMDANI_ID: u64 = 538929;
pub const CUOMO_ID: u64 = 538930;

/// Standalone (non-event) market used for the numeric id scenario.
pub const STANDALONE_ID: u64 = 551142;

#[derive(Clone)]
enum Canned {
    Found(Value),
    Fail(u16),
    Hang,
}

/// In-memory Gamma stand-in. Unknown queries answer like the real API:
/// `/{resource}/{id}` is not found, list endpoints return `[]`.
#[derive(Default)]
#[allow(dead_code)]
pub struct StubSource {
    responses: Mutex<HashMap<String, Canned>>,
    calls: AtomicUsize,
    log: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl StubSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to the query rendered as e.g. `markets?slug=foo` or `events/1`.
    pub fn respond(&self, query: &str, body: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), Canned::Found(body));
    }

    pub fn fail(&self, query: &str, status: u16) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), Canned::Fail(status));
    }

    /// Never answer this query, like an upstream that stalls forever.
    pub fn hang(&self, query: &str) {
        self.responses
            .lock()
            .unwrap()
            .insert(query.to_string(), Canned::Hang);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

impl MarketDataSource for StubSource {
    fn fetch<'a>(&'a self, query: &'a QuerySpec) -> BoxFuture<'a, Result<Fetched, FetchError>> {
        async move {
            let key = query.to_string();
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.log.lock().unwrap().push(key.clone());

            let canned = self.responses.lock().unwrap().get(&key).cloned();
            match canned {
                Some(Canned::Found(body)) => Ok(Fetched::Found(body)),
                Some(Canned::Fail(status)) => Err(FetchError::Status(status)),
                Some(Canned::Hang) => futures_util::future::pending().await,
                None if key.contains('?') => Ok(Fetched::Found(json!([]))),
                None => Ok(Fetched::NotFound),
            }
        }
        .boxed()
    }
}

fn event_stub() -> Value {
    json!({ "id": EVENT_ID.to_string(), "slug": EVENT_SLUG, "title": "New York City Mayoral Election" })
}

pub fn market_json(id: u64, slug: &str, candidate: &str, yes: &str, no: &str) -> Value {
    json!({
        "id": id.to_string(),
        "question": format!("Will {candidate} win the 2025 NYC mayoral election?"),
        "conditionId": format!("0x{:064x}", id),
        "slug": slug,
        "questionID": format!("0x{:064x}", id + 1_000_000),
        "groupItemTitle": candidate,
        "outcomes": "[\"Yes\", \"No\"]",
        "outcomePrices": "[\"0.12\", \"0.88\"]",
        "clobTokenIds": format!("[\"{yes}\", \"{no}\"]"),
        "active": true,
        "closed": false,
        "negRisk": true,
        "events": [event_stub()],
    })
}

pub fn adams_json() -> Value {
    let mut market = market_json(ADAMS_ID, ADAMS_SLUG, "Eric Adams", ADAMS_YES_TOKEN, ADAMS_NO_TOKEN);
    market["conditionId"] = json!(ADAMS_CONDITION_ID);
    market["questionID"] = json!(ADAMS_QUESTION_ID);
    market["outcomePrices"] = json!("[\"0.0035\", \"0.9965\"]");
    market
}

pub fn event_json() -> Value {
    json!({
        "id": EVENT_ID.to_string(),
        "slug": EVENT_SLUG,
        "title": "New York City Mayoral Election",
        "negRisk": true,
        "negRiskMarketID": "0x4ac98d2bd1e9c04dd52a36b9e1b1a5e0c28e04a5b1bff5a4a1e1b1f6e0f1c200",
        "markets": [
            { "id": ADAMS_ID.to_string(), "slug": ADAMS_SLUG },
            { "id": MAMDANI_ID.to_string(), "slug": "will-zohran-mamdani-win-the-2025-nyc-mayoral-election" },
            { "id": CUOMO_ID.to_string(), "slug": "will-andrew-cuomo-win-the-2025-nyc-mayoral-election" },
        ],
    })
}

/// Gamma fixture for the NYC mayoral event, its three candidate markets and
/// one standalone market, wired to every lookup shape the resolver uses.
pub fn nyc_source() -> StubSource {
    let source = StubSource::new();

    let adams = adams_json();
    let mamdani = market_json(
        MAMDANI_ID,
        "will-zohran-mamdani-win-the-2025-nyc-mayoral-election",
        "Zohran Mamdani",
        "111111111111111111111111",
        "222222222222222222222222",
    );
    let cuomo = market_json(
        CUOMO_ID,
        "will-andrew-cuomo-win-the-2025-nyc-mayoral-election",
        "Andrew Cuomo",
        "333333333333333333333333",
        "444444444444444444444444",
    );

    source.respond(&format!("events?slug={EVENT_SLUG}"), json!([event_json()]));
    source.respond(&format!("events/{EVENT_ID}"), event_json());

    source.respond(&format!("markets/{ADAMS_ID}"), adams.clone());
    source.respond(&format!("markets?slug={ADAMS_SLUG}"), json!([adams.clone()]));
    source.respond(
        &format!("markets?question_ids={ADAMS_QUESTION_ID}"),
        json!([adams.clone()]),
    );
    source.respond(
        &format!("markets?condition_ids={ADAMS_CONDITION_ID}"),
        json!([adams.clone()]),
    );
    source.respond(&format!("markets?clob_token_ids={ADAMS_NO_TOKEN}"), json!([adams]));

    source.respond(&format!("markets/{MAMDANI_ID}"), mamdani);
    source.respond(&format!("markets/{CUOMO_ID}"), cuomo);

    source.respond(
        &format!("markets/{STANDALONE_ID}"),
        json!({
            "id": STANDALONE_ID.to_string(),
            "slug": "will-steve-sweeney-win-the-new-jersey-governor-election-in-2025",
            "question": "Will Steve Sweeney win the New Jersey Governor Election in 2025?",
            "conditionId": "0x1111111111111111111111111111111111111111111111111111111111111111",
            "questionID": "0x2222222222222222222222222222222222222222222222222222222222222222",
            "outcomes": "[\"Yes\", \"No\"]",
            "clobTokenIds": "[\"5551\", \"5552\"]",
            "active": true,
        }),
    );

    source
}

#[allow(dead_code)]
pub fn resolver_with(source: Arc<StubSource>) -> Resolver {
    Resolver::new(source).with_fan_out(4)
}
