use axum::{response::Html, routing::get, Router};

pub fn router() -> Router {
    Router::new().route("/", get(index))
}

async fn index() -> Html<&'static str> {
    Html(r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Claim Lens - Insurance Claim Analysis</title>
  <style>
    body { font-family: Arial, sans-serif; margin: 2rem; color: #1d1d1f; max-width: 760px; }
    h1 { margin-bottom: 0.5rem; }
    .card { border: 1px solid #ddd; padding: 1rem; border-radius: 8px; margin-bottom: 1rem; }
    button { margin-top: 1rem; padding: 0.6rem 1rem; }
    .hidden { display: none; }
    #score-display { display: inline-block; min-width: 4rem; padding: 0.75rem; border-radius: 8px;
                     color: #fff; font-size: 1.8rem; font-weight: 700; text-align: center; }
    pre { background: #f6f8fa; padding: 1rem; white-space: pre-wrap; }
  </style>
</head>
<body>
  <h1>Claim Lens</h1>
  <p>Upload an insurance claim (PDF or TXT) to check it for inconsistencies.</p>

  <div class="card">
    <form id="upload-form">
      <input id="document" name="file" type="file" accept=".pdf,.txt" />
      <button type="submit">Analyze</button>
    </form>
    <div id="loading" class="hidden">Analyzing document...</div>
  </div>

  <div id="results-section" class="card hidden">
    <h2>Trustworthiness</h2>
    <div id="score-display"><span id="score-value"></span></div>
    <h2>Summary</h2>
    <p id="summary-text"></p>
    <h2>Detailed analysis</h2>
    <pre id="detailed-analysis"></pre>
  </div>

  <script>
    const uploadForm = document.getElementById('upload-form');
    const loadingDiv = document.getElementById('loading');
    const resultsSection = document.getElementById('results-section');

    uploadForm.addEventListener('submit', async (e) => {
      e.preventDefault();
      const file = document.getElementById('document').files[0];
      if (!file) {
        alert('Please select a file to analyze');
        return;
      }
      const fileType = file.name.split('.').pop().toLowerCase();
      if (fileType !== 'pdf' && fileType !== 'txt') {
        alert('Only PDF and TXT files are supported');
        return;
      }

      loadingDiv.classList.remove('hidden');
      resultsSection.classList.add('hidden');

      const formData = new FormData();
      formData.append('file', file);

      try {
        const res = await fetch('/analyze/', { method: 'POST', body: formData });
        const json = await res.json();
        if (!res.ok) {
          throw new Error(json.detail || `Server responded with status: ${res.status}`);
        }

        const score = json.trustworthiness_score;
        document.getElementById('score-value').textContent = score;
        document.getElementById('summary-text').textContent = json.summary;
        document.getElementById('detailed-analysis').textContent = json.detailed_analysis;
        document.getElementById('score-display').style.backgroundColor =
          score < 30 ? '#e74c3c' : score < 70 ? '#f39c12' : '#2ecc71';
        resultsSection.classList.remove('hidden');
      } catch (err) {
        console.error('Error:', err);
        alert('An error occurred while analyzing the document: ' + err.message);
      } finally {
        loadingDiv.classList.add('hidden');
      }
    });
  </script>
</body>
</html>"#)
}
