//! ROM path resolution: a cartridge image given directly, inside a ZIP
//! archive, or as the first `.gb` file of a directory.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Resolve a ROM path and read the cartridge image.
///
/// Resolution order:
/// 1. If `path` ends with `.zip` → the first `.gb` entry of the archive.
/// 2. If `path` is a directory → the first `.gb` file in it, by name.
/// 3. Otherwise `path` is read as the image itself.
pub fn load_rom(path: &Path) -> io::Result<Vec<u8>> {
    if has_extension(path, "zip") {
        return load_from_zip(path);
    }

    if path.is_dir() {
        let image = find_in_directory(path)?;
        return std::fs::read(image);
    }

    std::fs::read(path).map_err(|e| {
        io::Error::new(e.kind(), format!("ROM path not found: {}: {e}", path.display()))
    })
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn no_image(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("no .gb image in {}", path.display()),
    )
}

fn find_in_directory(dir: &Path) -> io::Result<PathBuf> {
    let mut images: Vec<_> = std::fs::read_dir(dir)?
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && has_extension(p, "gb"))
        .collect();
    images.sort();
    images.into_iter().next().ok_or_else(|| no_image(dir))
}

/// Extract the first `.gb` entry from a ZIP archive.
fn load_from_zip(path: &Path) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut archive = zip::ZipArchive::new(reader).map_err(|e| {
        io::Error::new(io::ErrorKind::InvalidData, format!("invalid ZIP: {e}"))
    })?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).map_err(|e| {
            io::Error::new(io::ErrorKind::InvalidData, format!("ZIP entry error: {e}"))
        })?;

        if entry.is_dir() || !has_extension(Path::new(entry.name()), "gb") {
            continue;
        }

        let mut data = Vec::with_capacity(entry.size() as usize);
        entry.read_to_end(&mut data)?;
        return Ok(data);
    }

    Err(no_image(path))
}
