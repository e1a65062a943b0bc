use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::distributions::Alphanumeric;
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

pub const KEY_PREFIX_LEN: usize = 8;
const KEY_MARKER: &str = "sc_";

/// 公共 API 的权限范围
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    ChartsRead,
    CategoriesRead,
    LabelsRead,
}

impl Scope {
    pub const WILDCARD: &'static str = "*";

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::ChartsRead => "charts:read",
            Scope::CategoriesRead => "categories:read",
            Scope::LabelsRead => "labels:read",
        }
    }

    pub fn all() -> Vec<String> {
        [Scope::ChartsRead, Scope::CategoriesRead, Scope::LabelsRead]
            .iter()
            .map(|s| s.as_str().to_string())
            .collect()
    }

    pub fn is_known(raw: &str) -> bool {
        raw == Self::WILDCARD || Self::all().iter().any(|s| s == raw)
    }

    pub fn granted_by(&self, scopes: &[String]) -> bool {
        scopes
            .iter()
            .any(|s| s == Self::WILDCARD || s == self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct GeneratedKey {
    /// 完整密钥，仅在创建时返回一次
    pub raw: String,
    pub prefix: String,
    pub hash: String,
}

/// 格式：sc_<8 位前缀>_<base64url 随机串>
pub fn generate_api_key() -> GeneratedKey {
    let mut rng = rand::thread_rng();
    let prefix: String = (&mut rng)
        .sample_iter(&Alphanumeric)
        .take(KEY_PREFIX_LEN)
        .map(|c| (c as char).to_ascii_lowercase())
        .collect();
    let mut secret = [0u8; 24];
    rng.fill_bytes(&mut secret);
    let raw = format!("{}{}_{}", KEY_MARKER, prefix, URL_SAFE_NO_PAD.encode(secret));
    GeneratedKey {
        hash: hash_api_key(&raw),
        raw,
        prefix,
    }
}

pub fn hash_api_key(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// 与存储的哈希比对，耗时与首个不同字节的位置无关
pub fn verify_api_key(raw: &str, stored_hash: &str) -> bool {
    let computed = hash_api_key(raw);
    if computed.len() != stored_hash.len() {
        return false;
    }
    computed
        .bytes()
        .zip(stored_hash.bytes())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}

/// 返回前缀；格式不对返回 None
pub fn parse_api_key(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix(KEY_MARKER)?;
    let (prefix, secret) = rest.split_once('_')?;
    if prefix.len() != KEY_PREFIX_LEN
        || !prefix.chars().all(|c| c.is_ascii_alphanumeric())
        || secret.is_empty()
    {
        return None;
    }
    Some(prefix)
}
