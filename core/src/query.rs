//! Query string serialization for GET helpers.

use std::fmt::Display;

/// Serialize `params` as `key=value` pairs joined by `&`, in iteration order.
///
/// Keys and values are percent-encoded as URI components. An empty iterator
/// yields an empty string.
pub fn encode_query<I, K, V>(params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    params
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(&v.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append `params` to `url` after a `?`. Leaves `url` alone when there is
/// nothing to append.
pub fn with_query<I, K, V>(url: &str, params: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Display,
{
    let query = encode_query(params);
    if query.is_empty() {
        url.to_string()
    } else {
        format!("{url}?{query}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_values_keep_order_and_encode_spaces() {
        let params: [(&str, &dyn Display); 2] = [("a", &1), ("b", &"x y")];
        assert_eq!(with_query("/items", params), "/items?a=1&b=x%20y");
    }

    #[test]
    fn empty_params_leave_url_untouched() {
        let params: Vec<(String, String)> = Vec::new();
        assert_eq!(with_query("/items", params), "/items");
    }

    #[test]
    fn keys_are_encoded_too() {
        assert_eq!(encode_query([("a&b", "c=d")]), "a%26b=c%3Dd");
    }

    #[test]
    fn non_ascii_is_utf8_percent_encoded() {
        assert_eq!(encode_query([("q", "café")]), "q=caf%C3%A9");
    }

    #[test]
    fn unreserved_characters_pass_through() {
        assert_eq!(encode_query([("k", "a-b_c.d~e")]), "k=a-b_c.d~e");
    }
}
