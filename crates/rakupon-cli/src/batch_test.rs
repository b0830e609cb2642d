use super::*;

use rakupon_core::TitleStyle;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Config pointed at the mock server: no pacing, no request retries, one
/// concurrent item, so tests run fast and request counts are predictable.
fn test_config(base_url: &str, title_style: TitleStyle) -> AppConfig {
    AppConfig {
        service_secret: "secret".to_string(),
        license_key: "license".to_string(),
        api_base_url: base_url.to_string(),
        log_level: "info".to_string(),
        hits_limit: 100,
        request_timeout_secs: 5,
        user_agent: "rakupon-test/0.1".to_string(),
        inter_request_delay_ms: 0,
        max_retries: 0,
        retry_backoff_base_secs: 0,
        max_concurrent_items: 1,
        batch_max_retries: 0,
        batch_retry_pause_secs: 0,
        title_style,
        strict_condition_types: false,
    }
}

/// Catalog page: `widget-001` with two distinct prices (1000 min) and
/// `sample-001` with no priced variants (skipped during normalization).
fn items_page() -> serde_json::Value {
    json!({
        "results": [
            {
                "item": {
                    "manageNumber": "widget-001",
                    "title": "【Old】Widget",
                    "variants": {
                        "red": { "standardPrice": 1000 },
                        "blue": { "standardPrice": 1200 }
                    }
                }
            },
            {
                "item": {
                    "manageNumber": "sample-001",
                    "title": "Sample",
                    "variants": { "free": {} }
                }
            }
        ],
        "nextCursorMark": "*"
    })
}

/// Store-wide search result: a half-price coupon gated on a 2000-yen spend.
/// At a 1000-yen base price its condition fails, so the item coupon must win
/// despite the worse resulting price.
fn store_coupon_search_body() -> &'static str {
    r"<result>
        <couponSearchRequest>
            <couponCode></couponCode>
        </couponSearchRequest>
        <coupons>
            <coupon>
                <couponCode>ALLHALF</couponCode>
                <itemType>4</itemType>
                <couponStartDate>2020-01-01T00:00:00+09:00</couponStartDate>
                <couponEndDate>2099-01-01T00:00:00+09:00</couponEndDate>
                <discountType>2</discountType>
                <discountFactor>50</discountFactor>
            </coupon>
        </coupons>
    </result>"
}

fn item_coupon_search_body() -> &'static str {
    r"<result>
        <couponSearchRequest>
            <couponCode></couponCode>
        </couponSearchRequest>
        <coupons>
            <coupon>
                <couponCode>ITEMSAVE</couponCode>
                <itemType>1</itemType>
                <couponStartDate>2020-01-01T00:00:00+09:00</couponStartDate>
                <couponEndDate>2099-01-01T00:00:00+09:00</couponEndDate>
                <discountType>1</discountType>
                <discountFactor>200</discountFactor>
            </coupon>
        </coupons>
    </result>"
}

async fn mount_pipeline_mocks(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/es/2.0/items/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&items_page()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/es/1.0/coupon/search"))
        .and(query_param("itemUrl", "widget-001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(item_coupon_search_body()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/es/1.0/coupon/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(store_coupon_search_body()))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/es/1.0/coupon/get"))
        .and(query_param("couponCode", "ALLHALF"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r"<result>
                <couponDetail>
                    <conditionTypeCode>RS003</conditionTypeCode>
                    <startValue>2000</startValue>
                </couponDetail>
            </result>",
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/es/1.0/coupon/get"))
        .and(query_param("couponCode", "ITEMSAVE"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<result><couponDetail></couponDetail></result>"),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn dry_run_counts_products_and_skips_unpriced_items() {
    let server = MockServer::start().await;
    mount_pipeline_mocks(&server).await;

    let config = test_config(&server.uri(), TitleStyle::DateBanner);
    let totals = run_batch(&config, true, Uuid::new_v4())
        .await
        .expect("expected dry run to succeed");

    assert_eq!(totals.products, 1);
    assert_eq!(totals.skipped, 1);
    assert_eq!(totals.updated, 0);
    assert_eq!(totals.update_failures, 0);
}

#[tokio::test]
async fn run_submits_arrow_style_title_for_winning_item_coupon() {
    let server = MockServer::start().await;
    mount_pipeline_mocks(&server).await;

    // The store-wide half-price coupon computes a lower price (500) but its
    // 2000-yen condition fails at base price 1000, so the 200-yen item coupon
    // wins: 1000 → 800, with the multi-price ～ suffix, old banner stripped.
    Mock::given(method("PATCH"))
        .and(path("/es/2.0/items/manage-numbers/widget-001"))
        .and(body_json(json!({ "title": "【クーポンで1,000円→800円～】Widget" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), TitleStyle::PriceArrow);
    let totals = run_batch(&config, false, Uuid::new_v4())
        .await
        .expect("expected run to succeed");

    assert_eq!(totals.products, 1);
    assert_eq!(totals.updated, 1);
    assert_eq!(totals.update_failures, 0);
}

#[tokio::test]
async fn failed_title_update_is_counted_not_fatal() {
    let server = MockServer::start().await;
    mount_pipeline_mocks(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/es/2.0/items/manage-numbers/widget-001"))
        .respond_with(ResponseTemplate::new(400))
        .mount(&server)
        .await;

    let config = test_config(&server.uri(), TitleStyle::PriceArrow);
    let totals = run_batch(&config, false, Uuid::new_v4())
        .await
        .expect("expected run to complete despite the update failure");

    assert_eq!(totals.updated, 0);
    assert_eq!(totals.update_failures, 1);
}

#[tokio::test]
async fn strict_mode_excludes_coupons_with_unrecognized_condition_types() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/es/2.0/items/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&items_page()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/es/1.0/coupon/search"))
        .and(query_param("itemUrl", "widget-001"))
        .respond_with(ResponseTemplate::new(200).set_body_string(item_coupon_search_body()))
        .mount(&server)
        .await;

    // No store-wide coupons in play for this test.
    Mock::given(method("GET"))
        .and(path("/es/1.0/coupon/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<result><coupons></coupons></result>"),
        )
        .mount(&server)
        .await;

    // The item coupon carries a per-user-limit style condition; under strict
    // handling it must be excluded, leaving nothing to apply. The arrow style
    // then has no claim to make: the bare name is submitted unchanged.
    Mock::given(method("GET"))
        .and(path("/es/1.0/coupon/get"))
        .and(query_param("couponCode", "ITEMSAVE"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r"<result>
                <couponDetail>
                    <conditionTypeCode>RS002</conditionTypeCode>
                    <startValue>1</startValue>
                </couponDetail>
            </result>",
        ))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/es/2.0/items/manage-numbers/widget-001"))
        .and(body_json(json!({ "title": "Widget" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = test_config(&server.uri(), TitleStyle::PriceArrow);
    config.strict_condition_types = true;

    let totals = run_batch(&config, false, Uuid::new_v4())
        .await
        .expect("expected run to succeed");
    assert_eq!(totals.updated, 1);
}

#[tokio::test]
async fn batch_retry_reruns_pipeline_after_transient_failure() {
    let server = MockServer::start().await;

    // First catalog fetch fails outright; the batch-level retry must re-run
    // the whole pipeline and succeed on the second attempt.
    Mock::given(method("GET"))
        .and(path("/es/2.0/items/search"))
        .respond_with(ResponseTemplate::new(403))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_pipeline_mocks(&server).await;

    let mut config = test_config(&server.uri(), TitleStyle::DateBanner);
    config.batch_max_retries = 1;

    let totals = run_with_batch_retry(&config, true)
        .await
        .expect("expected second attempt to succeed");
    assert_eq!(totals.products, 1);
}
