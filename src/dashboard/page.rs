//! Single-page dashboard markup

use crate::types::features::{FeatureSpec, FEATURE_SCHEMA};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; background: #0e1117; color: #fafafa; }
aside { width: 320px; padding: 1.5rem; background: #262730; }
main { flex: 1; padding: 2rem 3rem; }
label { display: block; margin-top: 1rem; font-size: 0.9rem; }
input[type=range] { width: 100%; }
.value { float: right; color: #ff4b4b; }
button { margin-top: 1.5rem; width: 100%; padding: 0.6rem; font-size: 1rem; cursor: pointer; }
.metrics { display: flex; gap: 2rem; }
.metric { flex: 1; }
.metric .number { font-size: 2.2rem; }
.status { padding: 0.8rem; border-radius: 0.4rem; }
.stable { background: #173928; } .warning { background: #3e3a16; } .critical { background: #3e1717; }
progress { width: 100%; height: 1.2rem; }
.bar { background: #ff4b4b; height: 1rem; margin: 0.2rem 0; }
.error { color: #ff6b6b; }
"#;

const SCRIPT: &str = r#"
document.querySelectorAll('input[type=range]').forEach(function (slider) {
  slider.addEventListener('input', function () {
    document.getElementById(slider.id + '-value').textContent = slider.value;
  });
});

document.getElementById('predict').addEventListener('click', async function () {
  const body = {};
  document.querySelectorAll('input[type=range]').forEach(function (s) { body[s.id] = parseFloat(s.value); });
  const out = document.getElementById('results');
  const res = await fetch('/api/predict', {
    method: 'POST', headers: { 'Content-Type': 'application/json' }, body: JSON.stringify(body)
  });
  const data = await res.json();
  if (!res.ok) { out.innerHTML = '<p class="error">' + data.error + '</p>'; return; }

  let html = '<h2>📊 Prediction Results</h2><div class="metrics">'
    + '<div class="metric">🔥 Hot Metal Temperature (°C)<div class="number">' + data.predicted_temperature + '</div></div>'
    + '<div class="metric">⚡ Efficiency Score<div class="number">' + data.efficiency_score + '</div></div>'
    + '<div class="metric"><div class="status ' + data.risk_level + '">Risk Status: ' + data.risk_label + '</div></div>'
    + '</div><hr><h3>📈 Efficiency Visualization</h3><progress max="100" value="' + data.efficiency_progress + '"></progress>'
    + '<hr><h3>📌 Model Feature Importance</h3>';
  if (data.importances) {
    const top = data.importances.length ? data.importances[0].importance : 1;
    data.importances.forEach(function (f) {
      const width = top > 0 ? (100 * f.importance / top) : 0;
      html += '<div>' + f.feature + ' (' + f.importance.toFixed(4) + ')<div class="bar" style="width:' + width + '%"></div></div>';
    });
  } else {
    html += '<p>' + data.importance_message + '</p>';
  }
  out.innerHTML = html;
});
"#;

fn slider(spec: &FeatureSpec) -> String {
    format!(
        r#"<label for="{name}">{label}<span class="value" id="{name}-value">{default}</span></label>
<input type="range" id="{name}" min="{min}" max="{max}" step="0.01" value="{default}">
"#,
        name = spec.name,
        label = spec.label,
        min = spec.min,
        max = spec.max,
        default = spec.default,
    )
}

/// Render the dashboard page with one slider per model input.
pub fn render_index() -> String {
    let mut sliders = String::new();
    for spec in &FEATURE_SCHEMA {
        sliders.push_str(&slider(spec));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>FurnaceAI - Blast Furnace Digital Twin</title>
<style>{STYLE}</style>
</head>
<body>
<aside>
<h3>⚙ Furnace Operating Parameters</h3>
{sliders}<button id="predict">🚀 Predict Furnace Condition</button>
</aside>
<main>
<h1>🔥 FurnaceAI – Blast Furnace Digital Twin</h1>
<p>AI-Based Hot Metal Temperature &amp; Efficiency Prediction System</p>
<hr>
<div id="results"></div>
</main>
<script>{SCRIPT}</script>
</body>
</html>
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_has_every_slider_in_order() {
        let html = render_index();
        let mut last = 0;
        for spec in &FEATURE_SCHEMA {
            let pos = html
                .find(&format!(r#"id="{}" min="#, spec.name))
                .unwrap_or_else(|| panic!("missing slider {}", spec.name));
            assert!(pos > last, "{} out of order", spec.name);
            last = pos;
        }
        assert!(html.contains("Predict Furnace Condition"));
    }

    #[test]
    fn test_slider_bounds() {
        let html = slider(&FEATURE_SCHEMA[6]);
        assert!(html.contains(r#"min="1" max="1.4""#));
        assert!(html.contains(r#"value="1.2""#));
        assert!(html.contains("Slag Basicity (CaO/SiO₂)"));
    }
}
