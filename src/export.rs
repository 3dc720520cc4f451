use anyhow::anyhow;
use reqwest::Url;

pub const ABCJS_EDITOR_URL: &str = "https://www.abcjs.net/abcjs-editor";

// Query parameter the editor reads the notation from
pub const TUNE_PARAM: &str = "abc";

// Builds links that open a tune in an embeddable notation editor
#[derive(Debug, Clone)]
pub struct EditorLink {
    base: Url,
}

impl EditorLink {
    pub fn new(base: &str) -> anyhow::Result<Self> {
        let base = Url::parse(base).map_err(|e| anyhow!("invalid editor url {base:?}: {e}"))?;
        if base.cannot_be_a_base() {
            anyhow::bail!("editor url {base} cannot carry a query");
        }
        Ok(Self { base })
    }

    // Percent-encodes the tune into the `abc` query parameter
    pub fn to_embeddable_url(&self, normalized_text: &str) -> Url {
        let mut url = self.base.clone();
        url.query_pairs_mut().append_pair(TUNE_PARAM, normalized_text);
        url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abcjs() -> EditorLink {
        EditorLink::new(ABCJS_EDITOR_URL).unwrap()
    }

    fn decoded_tune(url: &Url) -> Vec<String> {
        url.query_pairs()
            .filter(|(k, _)| k == TUNE_PARAM)
            .map(|(_, v)| v.into_owned())
            .collect()
    }

    #[test]
    fn tune_survives_the_round_trip() {
        let link = abcjs();
        let tunes = [
            "X:1\n2/4\nC D E F|",
            "X:1\nT:Drowsy Maggie\nM:4/4\nK:Edor\n|:E2BE dEBE|E2BE AFDF:|",
            "X:1\n\"Am\"A2 c/e/ & ^f=g _b|] % 100% ?#",
            "X:1\nT:Über Grüße 🎵\n",
        ];
        for tune in tunes {
            let url = link.to_embeddable_url(tune);
            assert_eq!(decoded_tune(&url), vec![tune.to_string()]);
        }
    }

    #[test]
    fn url_targets_the_editor_with_single_parameter() {
        let url = abcjs().to_embeddable_url("X:1\nC D|");
        assert!(url.as_str().starts_with("https://www.abcjs.net/abcjs-editor?abc="));
        assert_eq!(url.query_pairs().count(), 1);
        assert!(!url.as_str().contains('\n'));
        assert!(!url.as_str().contains(' '));
    }

    #[test]
    fn self_hosted_editor_keeps_its_own_query() {
        let link = EditorLink::new("http://localhost:9000/editor?theme=dark").unwrap();
        let url = link.to_embeddable_url("X:1\nK:G");
        assert_eq!(url.query(), Some("theme=dark&abc=X%3A1%0AK%3AG"));
    }

    #[test]
    fn unusable_bases_are_rejected() {
        assert!(EditorLink::new("not a url").is_err());
        assert!(EditorLink::new("mailto:tunes@example.com").is_err());
    }
}
