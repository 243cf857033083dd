use crate::aggregator::Dashboard;
use crate::predictor::PredictionResult;

pub fn render_index(view: &Dashboard, prediction: &PredictionResult) -> String {
    INDEX_HTML
        .replace("{{DATE}}", &view.today.to_string())
        .replace("{{TODAY_TIPS}}", &money(view.today_tips))
        .replace("{{WEEK_TIPS}}", &money(view.weekly.total_tips()))
        .replace("{{WEEK_TREND}}", &signed_percent(view.weekly.trend_percent()))
        .replace("{{MONTH_TIPS}}", &money(view.monthly.total_tips()))
        .replace("{{MONTH_TREND}}", &signed_percent(view.monthly.trend_percent()))
        .replace("{{PREDICTED}}", &money(prediction.predicted_total_tips))
        .replace("{{RANGE}}", &format!("{} – {}", money(prediction.min_range), money(prediction.max_range)))
        .replace("{{EXPLANATION}}", &escape(&prediction.explanation))
}

fn money(value: f64) -> String {
    format!("€{value:.2}")
}

fn signed_percent(value: i64) -> String {
    format!("{value:+}%")
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Rider Tips Tracker</title>
  <style>
    :root {
      --bg: #f3f6f4;
      --ink: #1f2a24;
      --muted: #5d6b63;
      --accent: #1f8a5b;
      --warn: #c2571a;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(31, 42, 36, 0.12);
    }

    * { box-sizing: border-box; }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 24px 16px 48px;
    }

    main {
      max-width: 760px;
      margin: 0 auto;
      display: grid;
      gap: 20px;
    }

    h1 { margin: 0; font-size: 1.9rem; }
    h2 { margin: 0 0 12px; font-size: 1.1rem; }
    .muted { color: var(--muted); margin: 4px 0 0; }

    .cards {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(160px, 1fr));
      gap: 12px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 16px 18px;
    }

    .label { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.06em; color: var(--muted); }
    .value { font-size: 1.6rem; font-weight: 600; margin-top: 6px; }
    .trend { font-size: 0.9rem; color: var(--accent); }

    .week {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
      text-align: center;
    }

    .day { border-radius: 10px; padding: 8px 4px; background: #e6efe9; font-size: 0.85rem; }
    .day.empty { background: transparent; border: 1px dashed #b8c5bd; color: var(--muted); }

    form { display: grid; grid-template-columns: repeat(auto-fit, minmax(140px, 1fr)); gap: 10px; }
    label { display: grid; gap: 4px; font-size: 0.85rem; color: var(--muted); }
    input, select { font: inherit; padding: 8px 10px; border-radius: 8px; border: 1px solid #c9d4cd; }

    button {
      font: inherit;
      border: none;
      border-radius: 10px;
      padding: 10px 16px;
      background: var(--accent);
      color: #fff;
      cursor: pointer;
      align-self: end;
    }

    .status { min-height: 1.2em; font-size: 0.9rem; }
    .status.error { color: var(--warn); }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Rider Tips Tracker</h1>
      <p class="muted">Today is <span id="today">{{DATE}}</span></p>
    </header>

    <section class="cards">
      <div class="card">
        <div class="label">Today</div>
        <div class="value" id="today-tips">{{TODAY_TIPS}}</div>
      </div>
      <div class="card">
        <div class="label">This week</div>
        <div class="value" id="week-tips">{{WEEK_TIPS}}</div>
        <div class="trend" id="week-trend">{{WEEK_TREND}} vs last week</div>
      </div>
      <div class="card">
        <div class="label">This month</div>
        <div class="value" id="month-tips">{{MONTH_TIPS}}</div>
        <div class="trend" id="month-trend">{{MONTH_TREND}} vs last month</div>
      </div>
    </section>

    <section class="card">
      <h2>Current week</h2>
      <div class="week" id="week"></div>
    </section>

    <section class="card">
      <h2>Next week</h2>
      <div class="value" id="predicted">{{PREDICTED}}</div>
      <p class="muted" id="range">{{RANGE}}</p>
      <p class="muted" id="explanation">{{EXPLANATION}}</p>
    </section>

    <section class="card">
      <h2>Log a shift</h2>
      <form id="shift-form">
        <label>Date <input type="date" name="date" value="{{DATE}}" required /></label>
        <label>Platform
          <select name="platform">
            <option>Uber Eats</option>
            <option>Lieferando</option>
            <option>Flink</option>
          </select>
        </label>
        <label>Start <input type="time" name="startTime" required /></label>
        <label>End <input type="time" name="endTime" required /></label>
        <label>Online tips <input type="number" name="onlineTips" min="0" step="0.01" value="0" /></label>
        <label>Cash tips <input type="number" name="cashTips" min="0" step="0.01" value="0" /></label>
        <label>Orders <input type="number" name="orders" min="0" step="1" value="0" /></label>
        <label>Shift type
          <select name="shiftType">
            <option>Full</option>
            <option>Half</option>
          </select>
        </label>
        <button type="submit">Save shift</button>
      </form>
      <p class="status" id="status"></p>
    </section>
  </main>

  <script>
    const money = (value) => `€${Number(value).toFixed(2)}`;
    const signed = (value) => `${value >= 0 ? '+' : ''}${value}%`;
    const statusEl = document.getElementById('status');

    const setStatus = (message, tone) => {
      statusEl.textContent = message;
      statusEl.className = `status ${tone || ''}`;
    };

    const renderWeek = (days) => {
      document.getElementById('week').innerHTML = days
        .map((day) => `<div class="day ${day.hasData ? '' : 'empty'}">${day.label}<br />${day.hasData ? money(day.totalTips) : '–'}</div>`)
        .join('');
    };

    const loadDashboard = async () => {
      const res = await fetch('/api/dashboard');
      if (!res.ok) {
        throw new Error('Unable to load dashboard');
      }
      const view = await res.json();
      document.getElementById('today-tips').textContent = money(view.todayTips);
      document.getElementById('week-tips').textContent = money(view.weekly.current.totalTips);
      document.getElementById('week-trend').textContent = `${signed(view.weekly.trend.trendPercent)} vs last week`;
      document.getElementById('month-tips').textContent = money(view.monthly.current.totalTips);
      document.getElementById('month-trend').textContent = `${signed(view.monthly.trend.trendPercent)} vs last month`;
      renderWeek(view.currentWeek);
    };

    const loadPrediction = async () => {
      const res = await fetch('/api/prediction');
      if (!res.ok) {
        throw new Error('Unable to load prediction');
      }
      const prediction = await res.json();
      document.getElementById('predicted').textContent = money(prediction.predictedTotalTips);
      document.getElementById('range').textContent = `${money(prediction.minRange)} – ${money(prediction.maxRange)} (${prediction.confidence})`;
      document.getElementById('explanation').textContent = prediction.explanation;
    };

    const refresh = () => Promise.all([loadDashboard(), loadPrediction()]);

    document.getElementById('shift-form').addEventListener('submit', async (event) => {
      event.preventDefault();
      const form = new FormData(event.target);
      const body = {
        date: form.get('date'),
        platform: form.get('platform'),
        startTime: `${form.get('startTime')}:00`,
        endTime: `${form.get('endTime')}:00`,
        onlineTips: Number(form.get('onlineTips')),
        cashTips: Number(form.get('cashTips')),
        orders: Number(form.get('orders')),
        shiftType: form.get('shiftType')
      };

      setStatus('Saving...');
      try {
        const res = await fetch('/api/shifts', {
          method: 'POST',
          headers: { 'content-type': 'application/json' },
          body: JSON.stringify(body)
        });
        if (!res.ok) {
          throw new Error((await res.text()) || 'Request failed');
        }
        await refresh();
        setStatus('Saved');
      } catch (err) {
        setStatus(err.message, 'error');
      }
    });

    refresh().catch((err) => setStatus(err.message, 'error'));
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::dashboard;
    use crate::predictor::predict_next_week;
    use chrono::NaiveDate;

    #[test]
    fn index_fills_every_placeholder() {
        let today = NaiveDate::from_ymd_opt(2026, 1, 7).unwrap();
        let html = render_index(&dashboard(&[], today), &predict_next_week(&[], today));
        assert!(!html.contains("{{"));
        assert!(html.contains("2026-01-07"));
        assert!(html.contains("Not enough data to make a prediction."));
        assert!(html.contains("+0% vs last week"));
    }
}
