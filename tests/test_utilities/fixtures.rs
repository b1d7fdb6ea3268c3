//! Kernel-like build trees on disk.
//!
//! Every tree lives in its own temporary directory; `src` and `out` are
//! canonical so the paths recorded in `.cmd` files match what the reader
//! resolves.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const FIXED_UUID: &str = "123e4567-e89b-12d3-a456-426614174000";
pub const FIXED_CREATED: &str = "2024-01-01T00:00:00Z";

pub struct BuildTree {
    _dir: TempDir,
    root: PathBuf,
    pub src: PathBuf,
    pub out: PathBuf,
}

impl BuildTree {
    /// Separate source and output trees, as with `make O=build`
    pub fn out_of_tree() -> Self {
        Self::create("linux", "build")
    }

    /// Objects built next to the sources
    pub fn in_tree() -> Self {
        Self::create("linux", "linux")
    }

    fn create(src: &str, out: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let src = root.join(src);
        let out = root.join(out);
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&out).unwrap();
        Self {
            _dir: dir,
            root,
            src,
            out,
        }
    }

    /// Directory holding both trees; also a place for files outside them
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_merged(&self) -> bool {
        self.src == self.out
    }

    pub fn source(&self, relative: &str, content: &str) -> PathBuf {
        write(self.src.join(relative), content)
    }

    pub fn output(&self, relative: &str, content: &str) -> PathBuf {
        write(self.out.join(relative), content)
    }

    /// A file in neither tree, e.g. a toolchain header
    pub fn external(&self, relative: &str, content: &str) -> PathBuf {
        write(self.root.join(relative), content)
    }

    /// Writes an artifact and the `.cmd` file kbuild leaves next to it
    pub fn artifact(&self, relative: &str, cmd: &str) -> PathBuf {
        let path = self.output(relative, "\u{7f}ELF");
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        fs::write(path.with_file_name(format!(".{}.cmd", name)), cmd).unwrap();
        path
    }

    /// An object compiled from `source`, with a full `deps_` block
    pub fn compiled(&self, object: &str, source: &Path, deps: &[String]) -> PathBuf {
        let dep_file = Path::new(object).with_extension("o.d");
        let mut cmd = format!(
            "savedcmd_{object} := gcc -Wp,-MMD,{} -nostdinc -D__KERNEL__ -c -o {object} {}\n\n\
             source_{object} := {}\n\n\
             deps_{object} := \\\n",
            dep_file.display(),
            source.display(),
            source.display(),
        );
        for dep in deps {
            cmd.push_str(&format!("  {} \\\n", dep));
        }
        cmd.push_str(&format!(
            "\n{object}: $(deps_{object})\n\n$(deps_{object}):\n"
        ));
        self.artifact(object, &cmd)
    }
}

fn write(path: PathBuf, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

fn display(path: &Path) -> String {
    path.display().to_string()
}

/// `a.out` linked from `b.o` and `c.o`, compiled from `b.c`, `c.c` and
/// `common.h`; both sources are MIT licensed
pub fn scenario_tree(tree: BuildTree) -> BuildTree {
    let b_c = tree.source("b.c", "// SPDX-License-Identifier: MIT\nint b;\n");
    let c_c = tree.source(
        "c.c",
        "// SPDX-License-Identifier: MIT\n#include \"common.h\"\nint c;\n",
    );
    let common_h = tree.source("common.h", "#define COMMON 1\n");

    tree.artifact("a.out", "savedcmd_a.out := ld -o a.out b.o c.o\n");
    tree.artifact(
        "b.o",
        &format!("savedcmd_b.o := gcc -c -o b.o {}\n", b_c.display()),
    );
    tree.compiled("c.o", &c_c, &[display(&c_c), display(&common_h)]);
    tree
}

/// A miniature kernel: `vmlinux` from two objects, a generated header in
/// the output tree, a toolchain header outside both trees and a Kconfig
/// dependency that must be dropped
pub fn kernel_tree(tree: BuildTree) -> BuildTree {
    tree.source(
        "COPYING",
        "The Linux Kernel is provided under:\n\n\tSPDX-License-Identifier: GPL-2.0 WITH Linux-syscall-note\n",
    );
    let main_c = tree.source(
        "init/main.c",
        "// SPDX-License-Identifier: GPL-2.0-only\n#include <linux/kernel.h>\n",
    );
    let fork_c = tree.source(
        "kernel/fork.c",
        "// SPDX-License-Identifier: GPL-2.0-only\n#include <linux/kernel.h>\n",
    );
    let kernel_h = tree.source(
        "include/linux/kernel.h",
        "/* SPDX-License-Identifier: GPL-2.0 */\n#pragma once\n",
    );
    let autoconf_h = tree.output("include/generated/autoconf.h", "#define CONFIG_SMP 1\n");
    let stdarg_h = tree.external("toolchain/include/stdarg.h", "#pragma once\n");
    tree.output(".config", "CONFIG_SMP=y\n");

    tree.artifact(
        "vmlinux",
        "savedcmd_vmlinux := ld -m elf_x86_64 -o vmlinux init/main.o kernel/fork.o\n",
    );
    tree.compiled(
        "init/main.o",
        &main_c,
        &[
            display(&main_c),
            display(&kernel_h),
            display(&autoconf_h),
            display(&stdarg_h),
            "$(wildcard include/config/SMP)".to_string(),
        ],
    );
    tree.compiled(
        "kernel/fork.o",
        &fork_c,
        &[display(&fork_c), display(&kernel_h)],
    );
    tree
}
