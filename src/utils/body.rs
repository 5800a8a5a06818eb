use aws_sdk_s3::primitives::{ByteStream, ByteStreamError};

/// 默认最多读取的字节数
pub const DEFAULT_READ_LIMIT: usize = 1024;

/// 读取对象内容时的长度上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadLimit {
    /// 最多读取指定字节数，超出部分丢弃
    Bytes(usize),
    /// 读取完整内容
    Unbounded,
}

impl Default for ReadLimit {
    fn default() -> Self {
        ReadLimit::Bytes(DEFAULT_READ_LIMIT)
    }
}

/// 逐块读取响应体，直到达到上限或流结束。
///
/// 单次读取可能返回少于可用数据的字节数，因此这里循环读取而不是只读一次。
///
/// # 参数
///
/// * `body` - 对象内容的字节流。
/// * `limit` - 读取上限。
///
/// # 返回值
///
/// 读取到的字节，长度不超过 `limit`。
pub async fn read_limited(
    body: &mut ByteStream,
    limit: ReadLimit,
) -> Result<Vec<u8>, ByteStreamError> {
    let mut buf = Vec::new();

    if limit == ReadLimit::Bytes(0) {
        return Ok(buf);
    }

    while let Some(chunk) = body.try_next().await? {
        buf.extend_from_slice(&chunk);

        if let ReadLimit::Bytes(max) = limit {
            if buf.len() >= max {
                buf.truncate(max);
                break;
            }
        }
    }

    Ok(buf)
}
