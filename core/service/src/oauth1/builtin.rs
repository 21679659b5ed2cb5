//! Built-in OAuth1 providers.

use url::Url;

use super::OAuth1Provider;

fn endpoint(url: &str) -> Url {
    Url::parse(url).expect("built-in endpoint is a valid URL")
}

/// Twitter.
pub fn twitter() -> OAuth1Provider {
    OAuth1Provider::new(
        "Twitter",
        endpoint("https://api.twitter.com/oauth/request_token"),
        endpoint("https://api.twitter.com/oauth/authenticate"),
        endpoint("https://api.twitter.com/oauth/access_token"),
    )
    .with_base_api_uri(endpoint("https://api.twitter.com/1.1/"))
}

/// Bitbucket.
pub fn bitbucket() -> OAuth1Provider {
    OAuth1Provider::new(
        "Bitbucket",
        endpoint("https://bitbucket.org/api/1.0/oauth/request_token"),
        endpoint("https://bitbucket.org/api/1.0/oauth/authenticate"),
        endpoint("https://bitbucket.org/api/1.0/oauth/access_token"),
    )
    .with_base_api_uri(endpoint("https://bitbucket.org/api/1.0/"))
}

/// Dropbox (legacy API). Shadowed by the OAuth2 declaration during resolution.
pub fn dropbox() -> OAuth1Provider {
    OAuth1Provider::new(
        "Dropbox",
        endpoint("https://api.dropbox.com/1/oauth/request_token"),
        endpoint("https://www.dropbox.com/1/oauth/authorize"),
        endpoint("https://api.dropbox.com/1/oauth/access_token"),
    )
    .with_base_api_uri(endpoint("https://api.dropbox.com/1/"))
}

/// Tumblr.
pub fn tumblr() -> OAuth1Provider {
    OAuth1Provider::new(
        "Tumblr",
        endpoint("https://www.tumblr.com/oauth/request_token"),
        endpoint("https://www.tumblr.com/oauth/authorize"),
        endpoint("https://www.tumblr.com/oauth/access_token"),
    )
    .with_base_api_uri(endpoint("https://api.tumblr.com/v2/"))
}

/// Every built-in OAuth1 provider.
pub fn all() -> Vec<OAuth1Provider> {
    vec![twitter(), bitbucket(), dropbox(), tumblr()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_are_normalized() {
        for provider in all() {
            let normalized = oauthkit_common::ProviderName::new(&provider.name);
            assert_eq!(normalized.as_str(), provider.name);
        }
    }

    #[test]
    fn test_builtins_sign_with_hmac_sha1() {
        assert!(all()
            .iter()
            .all(|p| p.signature_method == oauthkit_crypto::SignatureMethod::HmacSha1));
    }
}
