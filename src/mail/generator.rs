//! 邮箱地址生成：随机本地部分、自定义名清洗、地址拼接

use rand::Rng;

/// 随机本地部分的字符集：a-z + 0-9
const LOCAL_PART_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// 单个生成与随机批量使用的本地部分长度
pub const RANDOM_LOCAL_LEN: usize = 10;

/// 自定义名清洗后为空时，回退随机名的长度
pub const FALLBACK_LOCAL_LEN: usize = 8;

/// 生成 `length` 个字符的随机本地部分（有放回均匀抽样，不保证唯一）
pub fn random_local_part(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| LOCAL_PART_ALPHABET[rng.gen_range(0..LOCAL_PART_ALPHABET.len())] as char)
        .collect()
}

fn is_allowed(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '.' || ch == '_'
}

/// 将用户给出的名字清洗为可用的本地部分
///
/// 去首尾空白并转小写；空格及 `[a-z0-9._]` 以外的字符替换为 `.`；
/// 连续的 `.` 合并为一个；最后去掉首尾的 `.`。结果可能为空串，由调用方回退到随机名。
pub fn sanitize_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        let mapped = if is_allowed(ch) { ch } else { '.' };
        if mapped == '.' && cleaned.ends_with('.') {
            continue;
        }
        cleaned.push(mapped);
    }
    cleaned.trim_matches('.').to_string()
}

/// 清洗自定义名，为空时回退为 FALLBACK_LOCAL_LEN 位随机名
pub fn sanitize_or_random(raw: &str) -> String {
    let local = sanitize_name(raw);
    if local.is_empty() {
        random_local_part(FALLBACK_LOCAL_LEN)
    } else {
        local
    }
}

/// `local@domain`，域名合法性在设置域名时已校验
pub fn build_email(local_part: &str, domain: &str) -> String {
    format!("{local_part}@{domain}")
}
