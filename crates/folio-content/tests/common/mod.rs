//! Common helpers for folio-content integration tests.

use std::path::Path;

use tempfile::TempDir;

/// The two posts the blog was started with, as content files.
pub const STREAM_ANALYTICS: &str = "---
title: Windowing in Azure Stream Analytics
date: 2020-02-12 16:45:04 -0500
categories: [Azure, Stream Analytics]
tags: [azure, streaming]
image:
  path: assets/img/posts/windows.png
seo:
  date_modified: 2020-02-20 08:00:00 -0500
---

Stream Analytics offers four kinds of window.[^kinds]

## Tumbling

```sql
SELECT COUNT(*) FROM input GROUP BY TumblingWindow(second, 10)
```

> Tumbling windows never overlap.

[^kinds]: Tumbling, hopping, sliding, and session.
";

pub const CPP_TEMPLATES: &str = "---
title: \"C++20: Class Types as Template Parameters\"
date: 2021-07-01 09:30:00 +0200
categories: [C++]
tags: [cpp, templates]
---

C++20 relaxes the rules for non-type template parameters.

```cpp
template <auto N>
struct Fixed {};
```
";

/// A temporary content tree.
pub struct ContentDir {
    dir: TempDir,
}

impl ContentDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// A tree holding both sample posts under `_posts/`.
    pub fn with_samples() -> Self {
        let content = Self::new();
        content.write("_posts/2020-02-12-stream-analytics-windows.md", STREAM_ANALYTICS);
        content.write("_posts/2021-07-01-cpp20-template-parameters.md", CPP_TEMPLATES);
        content
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(path, content).expect("write content file");
    }
}
