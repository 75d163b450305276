use super::*;

#[test]
fn base_url_loses_trailing_slashes() {
    let c = ApiClient::with_client(Client::new(), "http://localhost:3000//");
    assert_eq!(c.base_url(), "http://localhost:3000");
    assert_eq!(c.url("/api/bag"), "http://localhost:3000/api/bag");
}

#[tokio::test]
async fn unreachable_host_gives_generic_message() {
    let c = ApiClient::with_client(Client::new(), "http://127.0.0.1:9");
    let err = c.delete_bag("b1").await.unwrap_err();
    assert_eq!(err.user_message(), DELETE_FAILED);
    let err = c.login("ana", "pw").await.unwrap_err();
    assert_eq!(err.user_message(), LOGIN_FAILED);
}
