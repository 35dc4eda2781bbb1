// src/render/assets.rs
// Static style and script blocks embedded in every generated document.

pub const BASE_STYLE: &str = r#"
body { font-family: '微軟正黑體', 'Microsoft JhengHei', sans-serif; margin: 20px; }
table { border-collapse: collapse; width: 100%; table-layout: fixed; }
th, td { border: 1px solid #aaa; padding: 8px; text-align: left; vertical-align: top; word-break: break-word; }
thead th { background: #eee; position: sticky; top: 0; z-index: 1; }
tbody tr:nth-child(even) { background-color: #f9f9f9; }
"#;

pub const ANNOTATION_STYLE: &str = r#"
tbody tr:hover { background-color: #eef; }
textarea { width: 100%; height: 80px; padding: 4px; box-sizing: border-box; }
select:disabled, textarea:disabled { background-color: #f5f5f5; color: #333; }
.button { padding: 10px 15px; margin: 10px; background: #4CAF50; color: white; border: none; cursor: pointer; }
"#;

/// Placeholder replaced with the JSON-encoded export file name.
pub const EXPORT_NAME_PLACEHOLDER: &str = "__EXPORT_FILE_NAME__";

pub const ANNOTATION_SCRIPT: &str = r#"
let confirmed = false;
const exportFileName = __EXPORT_FILE_NAME__;

function annotationControls() {
  return document.querySelectorAll('select.annotation, textarea.annotation');
}

function stateAttribute(el) {
  return el.tagName === 'TEXTAREA' ? 'data-content' : 'data-selected';
}

function toggleEdit() {
  confirmed = false;
  annotationControls().forEach(el => { el.disabled = false; });
}

function confirmEdit() {
  annotationControls().forEach(el => {
    el.setAttribute(stateAttribute(el), el.value);
    el.disabled = true;
  });
  confirmed = true;
}

function downloadModifiedHTML() {
  if (!confirmed) {
    alert('請先按「完成更新」再下載');
    return;
  }
  const html = '<!DOCTYPE html>\n' + document.documentElement.outerHTML;
  const blob = new Blob([html], { type: 'text/html;charset=utf-8' });
  const a = document.createElement('a');
  a.href = URL.createObjectURL(blob);
  a.download = exportFileName;
  document.body.appendChild(a);
  a.click();
  document.body.removeChild(a);
  URL.revokeObjectURL(a.href);
}

window.addEventListener('DOMContentLoaded', () => {
  annotationControls().forEach(el => {
    const stored = el.getAttribute(stateAttribute(el));
    el.value = stored !== null ? stored : (el.getAttribute('data-default') || '');
  });
});
"#;

pub const BUTTON_BAR: &str = r#"<div>
<button class="button" onclick="toggleEdit()">更新</button>
<button class="button" onclick="confirmEdit()">完成更新</button>
<button class="button" onclick="downloadModifiedHTML()">下載更新版本</button>
</div>"#;
