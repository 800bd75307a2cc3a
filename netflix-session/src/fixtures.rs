//! Canned pages and payloads for flow and client tests.

use netflix_fetch::MockTransport;
use serde_json::{json, Value};

pub(crate) const BUILD_ID: &str = "vtest123";
pub(crate) const API_ROOT: &str = "https://www.netflix.com/api/shakti/vtest123";
pub(crate) const ACCOUNT_TOKEN: &str = "acct-token";
pub(crate) const PROFILE_TOKEN: &str = "prof-token";

pub(crate) const LOGIN_PAGE: &str = r#"<html><body>
  <form method="post" class="login-form" action="">
    <div class="nfInput login-input login-input-email">
      <input type="email" name="userLoginId" value="">
    </div>
    <input type="password" name="password" value="">
    <input type="hidden" name="flow" value="websiteSignUp">
    <input type="hidden" name="mode" value="login">
    <input type="hidden" name="action" value="loginAction">
    <button type="submit">Sign In</button>
  </form>
</body></html>"#;

fn page(script: &str) -> String {
    format!(
        "<html><head><script src=\"/static/app.js\"></script>\
         <script>{script}</script></head><body></body></html>"
    )
}

/// Bootstrap page carrying `netflix.reactContext`.
pub(crate) fn react_page(token: &str, current_member: bool) -> String {
    let models = json!({
        "truths": {"data": {"CURRENT_MEMBER": current_member}},
        "serverDefs": {"data": {"BUILD_IDENTIFIER": BUILD_ID, "endpointIdentifiers": {}}},
        "memberContext": {"data": {"userInfo": {"authURL": token, "name": "Test"}}}
    });
    page(&format!(
        "window.netflix = window.netflix || {{}};\n\
         netflix.reactContext = {{\"models\": {models}}};\n\
         netflix.notes = 'Test\\x20User';"
    ))
}

/// Bootstrap page carrying `window.netflix.contextData`.
pub(crate) fn context_data_page(token: &str) -> String {
    let data = json!({"authURL": token, "serverDefs": {"BUILD_IDENTIFIER": BUILD_ID}});
    page(&format!("window.netflix = {{contextData: {data}}};"))
}

/// Queues a full password login ending in two reactContext bootstraps.
pub(crate) fn queue_password_login(mock: &MockTransport) {
    mock.push_response(200, LOGIN_PAGE)
        .push_response(302, "")
        .push_response(200, react_page(ACCOUNT_TOKEN, true))
        .push_response(200, react_page(PROFILE_TOKEN, true));
}

/// Queues a cookie login (two bootstraps).
pub(crate) fn queue_bootstrap(mock: &MockTransport) {
    mock.push_response(200, react_page(ACCOUNT_TOKEN, true))
        .push_response(200, react_page(PROFILE_TOKEN, true));
}

pub(crate) fn profile(guid: &str, name: &str, avatar: &str, active: bool) -> Value {
    json!({
        "guid": guid,
        "firstName": name,
        "avatarName": avatar,
        "isActive": active,
        "canEdit": true,
        "isKids": false,
        "experience": "standard"
    })
}
