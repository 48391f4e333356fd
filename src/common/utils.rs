use std::fs;
use std::io;
use std::path::Path;
use zeroize::Zeroizing;

/// 一次性读取整个密钥文件。
///
/// 文件不存在时返回 `Ok(None)`，其他 I/O 错误原样返回，由调用方决定如何处理。
/// 读取到的内容在离开作用域时自动清零。
pub(crate) fn read_key_file(path: &Path) -> io::Result<Option<Zeroizing<Vec<u8>>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(Zeroizing::new(bytes))),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}
