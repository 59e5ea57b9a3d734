use crate::{Directory, Error, Result, validate_name};

/// Recursively copy the contents of `src` into `dest`.
///
/// Files in `dest` with the same name are replaced; everything else already in
/// `dest` is left alone. The whole tree is checked against `dest` before the first
/// write, so a name that is a file on one side and a directory on the other fails
/// the copy with `dest` untouched.
pub fn copy_dir(src: &dyn Directory, dest: &dyn Directory) -> Result<()> {
    check_tree(src, Some(dest))?;
    copy_tree(src, dest)
}

fn check_tree(src: &dyn Directory, dest: Option<&dyn Directory>) -> Result<()> {
    let dest_files = match dest {
        Some(dest) => dest.file_names()?,
        None => Vec::new(),
    };

    for name in src.file_names()? {
        validate_name(&name)?;
        if dest.is_some_and(|dest| dest.subdirectory(&name).is_some()) {
            return Err(Error::KindConflict { name });
        }
    }

    for name in src.subdirectory_names()? {
        validate_name(&name)?;
        if dest_files.contains(&name) {
            return Err(Error::KindConflict { name });
        }
        let src_sub = src
            .subdirectory(&name)
            .ok_or_else(|| Error::NotFound { name: name.clone() })?;
        let dest_sub = dest.and_then(|dest| dest.subdirectory(&name));
        check_tree(&*src_sub, dest_sub.as_deref())?;
    }

    Ok(())
}

fn copy_tree(src: &dyn Directory, dest: &dyn Directory) -> Result<()> {
    for name in src.file_names()? {
        let content = src.read_file(&name)?;
        dest.write_file(&name, &content)?;
    }

    for name in src.subdirectory_names()? {
        let src_sub = src
            .subdirectory(&name)
            .ok_or_else(|| Error::NotFound { name: name.clone() })?;
        let dest_sub = dest.create_subdirectory(&name)?;
        copy_tree(&*src_sub, &*dest_sub)?;
    }

    Ok(())
}
