//! 文本令牌类分类器
//!
//! 前缀命中后在缓冲区中搜索确认令牌，或按文本语法逐字节校验。

use crate::core::classifier::Classifier;
use crate::core::session::{Direction, Session, FIELD_USER};
use crate::utils::search;

/// IMAP问候 ("* OK ... IMAP4rev1 ...")
#[derive(Debug, Clone, Copy, Default)]
pub struct ImapClassifier;

impl Classifier for ImapClassifier {
    fn name(&self) -> &'static str {
        "imap"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if !search::contains_from(data, 5, b"IMAP") {
            return false;
        }
        session.add_protocol("imap");
        true
    }
}

/// "220 " 服务横幅
///
/// 含LMTP标记为lmtp；既不含SMTP也不含" TLS"时标记为ftp。
#[derive(Debug, Clone, Copy, Default)]
pub struct Banner220Classifier;

impl Classifier for Banner220Classifier {
    fn name(&self) -> &'static str {
        "banner_220"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if search::contains(data, b"LMTP") {
            session.add_protocol("lmtp");
            return true;
        }
        if !search::contains(data, b"SMTP") && !search::contains(data, b" TLS") {
            session.add_protocol("ftp");
            return true;
        }
        false
    }
}

/// XMPP流头
#[derive(Debug, Clone, Copy, Default)]
pub struct JabberClassifier;

impl Classifier for JabberClassifier {
    fn name(&self) -> &'static str {
        "jabber"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if !search::contains_from(data, 5, b"jabber") {
            return false;
        }
        session.add_protocol("jabber");
        true
    }
}

const USER_PREFIX: &[u8] = b"USER ";

fn is_space(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// 明文 "USER name" 登录
///
/// 只提取用户字段，不添加协议标签。IRC注册序列被排除。
#[derive(Debug, Clone, Copy, Default)]
pub struct UserLoginClassifier;

impl Classifier for UserLoginClassifier {
    fn name(&self) -> &'static str {
        "user"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() <= USER_PREFIX.len() || !data.starts_with(USER_PREFIX) {
            return false;
        }
        if search::contains(data, b"\nNICK ") || search::contains(data, b" +iw ") {
            return false;
        }

        let rest = &data[USER_PREFIX.len()..];
        match rest.iter().position(|&b| is_space(b)) {
            Some(end) if end > 0 => {
                session.add_field_lowercase(FIELD_USER, &rest[..end]);
                true
            }
            _ => false,
        }
    }
}

/// syslog ("<PRI>")
///
/// '<'之后直到'>'只允许十进制数字。
#[derive(Debug, Clone, Copy, Default)]
pub struct SyslogClassifier;

impl Classifier for SyslogClassifier {
    fn name(&self) -> &'static str {
        "syslog"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if data.len() < 3 || data[0] != b'<' || !data[1].is_ascii_digit() {
            return false;
        }

        for &byte in &data[2..] {
            if byte == b'>' {
                session.add_protocol("syslog");
                return true;
            }
            if !byte.is_ascii_digit() {
                return false;
            }
        }
        false
    }
}

/// 文本形式的STUN响应 ("RSP/... STUN")
#[derive(Debug, Clone, Copy, Default)]
pub struct StunRspClassifier;

impl Classifier for StunRspClassifier {
    fn name(&self) -> &'static str {
        "stun"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if !search::contains_from(data, 7, b"STUN") {
            return false;
        }
        session.add_protocol("stun");
        true
    }
}

/// Dropbox局域网同步广播 (UDP 17500, JSON)
#[derive(Debug, Clone, Copy, Default)]
pub struct DropboxLanSyncClassifier;

impl Classifier for DropboxLanSyncClassifier {
    fn name(&self) -> &'static str {
        "dropbox-lan-sync"
    }

    fn try_classify(&self, session: &mut dyn Session, data: &[u8], _direction: Direction) -> bool {
        if !search::contains_from(data, 1, b"host_int") {
            return false;
        }
        session.add_protocol("dropbox-lan-sync");
        true
    }
}
