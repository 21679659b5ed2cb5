//! Built-in OAuth2 providers.

use url::Url;

use super::{AuthorizationMethod, OAuth2Provider};
use crate::descriptor::ScopeTable;

fn endpoint(url: &str) -> Url {
    Url::parse(url).expect("built-in endpoint is a valid URL")
}

/// GitHub.
pub fn github() -> OAuth2Provider {
    OAuth2Provider::new(
        "Github",
        endpoint("https://github.com/login/oauth/authorize"),
        endpoint("https://github.com/login/oauth/access_token"),
    )
    .with_base_api_uri(endpoint("https://api.github.com/"))
    .with_authorization_method(AuthorizationMethod::HeaderToken)
    .with_token_request_header("Accept", "application/json")
    .with_scopes(ScopeTable::from_pairs(&[
        ("SCOPE_READONLY", ""),
        ("SCOPE_USER", "user"),
        ("SCOPE_USER_EMAIL", "user:email"),
        ("SCOPE_USER_FOLLOW", "user:follow"),
        ("SCOPE_PUBLIC_REPO", "public_repo"),
        ("SCOPE_REPO", "repo"),
        ("SCOPE_REPO_DEPLOYMENT", "repo_deployment"),
        ("SCOPE_REPO_STATUS", "repo:status"),
        ("SCOPE_DELETE_REPO", "delete_repo"),
        ("SCOPE_NOTIFICATIONS", "notifications"),
        ("SCOPE_GIST", "gist"),
        ("SCOPE_HOOKS_READ", "read:repo_hook"),
        ("SCOPE_HOOKS_WRITE", "write:repo_hook"),
        ("SCOPE_HOOKS_ADMIN", "admin:repo_hook"),
        ("SCOPE_ORG_READ", "read:org"),
        ("SCOPE_ORG_WRITE", "write:org"),
        ("SCOPE_ORG_ADMIN", "admin:org"),
        ("SCOPE_PUBLIC_KEY_READ", "read:public_key"),
        ("SCOPE_PUBLIC_KEY_WRITE", "write:public_key"),
        ("SCOPE_PUBLIC_KEY_ADMIN", "admin:public_key"),
    ]))
}

/// Google.
pub fn google() -> OAuth2Provider {
    OAuth2Provider::new(
        "Google",
        endpoint("https://accounts.google.com/o/oauth2/auth"),
        endpoint("https://accounts.google.com/o/oauth2/token"),
    )
    .with_base_api_uri(endpoint("https://www.googleapis.com/oauth2/v1/"))
    .with_scopes(ScopeTable::from_pairs(&[
        ("SCOPE_EMAIL", "email"),
        ("SCOPE_PROFILE", "profile"),
        ("SCOPE_OPENID", "openid"),
        ("SCOPE_USERINFO_EMAIL", "https://www.googleapis.com/auth/userinfo.email"),
        ("SCOPE_USERINFO_PROFILE", "https://www.googleapis.com/auth/userinfo.profile"),
        ("SCOPE_GOOGLEDRIVE", "https://www.googleapis.com/auth/drive"),
        ("SCOPE_GOOGLEDRIVE_FILES", "https://www.googleapis.com/auth/drive.file"),
        ("SCOPE_CALENDAR", "https://www.googleapis.com/auth/calendar"),
        ("SCOPE_CALENDAR_READ_ONLY", "https://www.googleapis.com/auth/calendar.readonly"),
        ("SCOPE_GMAIL", "https://mail.google.com/"),
        ("SCOPE_YOUTUBE", "https://www.googleapis.com/auth/youtube"),
        ("SCOPE_YOUTUBE_READ_ONLY", "https://www.googleapis.com/auth/youtube.readonly"),
    ]))
}

/// Facebook. Tokens travel in the query string.
pub fn facebook() -> OAuth2Provider {
    OAuth2Provider::new(
        "Facebook",
        endpoint("https://www.facebook.com/dialog/oauth"),
        endpoint("https://graph.facebook.com/oauth/access_token"),
    )
    .with_base_api_uri(endpoint("https://graph.facebook.com/"))
    .with_authorization_method(AuthorizationMethod::QueryString {
        param: "access_token".to_string(),
    })
    .with_scopes(ScopeTable::from_pairs(&[
        ("SCOPE_EMAIL", "email"),
        ("SCOPE_PUBLIC_PROFILE", "public_profile"),
        ("SCOPE_USER_FRIENDS", "user_friends"),
        ("SCOPE_USER_BIRTHDAY", "user_birthday"),
        ("SCOPE_USER_PHOTOS", "user_photos"),
        ("SCOPE_USER_POSTS", "user_posts"),
        ("SCOPE_PAGES_SHOW_LIST", "pages_show_list"),
    ]))
}

/// Dropbox. Also available as an OAuth1 provider.
pub fn dropbox() -> OAuth2Provider {
    OAuth2Provider::new(
        "Dropbox",
        endpoint("https://www.dropbox.com/oauth2/authorize"),
        endpoint("https://api.dropboxapi.com/oauth2/token"),
    )
    .with_base_api_uri(endpoint("https://api.dropboxapi.com/2/"))
}

/// Every built-in OAuth2 provider.
pub fn all() -> Vec<OAuth2Provider> {
    vec![github(), google(), facebook(), dropbox()]
}
