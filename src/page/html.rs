//! Page shell served at `/`.
//!
//! The shell only provides the element slots and wires the browser to the
//! page server: it applies `/state` on load, then every update pushed over
//! `/ws`. All content comes from the Rust side.

/// HTML page shell.
pub const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Arena Client</title>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            background: #1a1a2e;
            color: #eee;
            margin: 0;
            padding: 16px 24px;
        }

        .header {
            display: flex;
            align-items: center;
            justify-content: space-between;
            margin-bottom: 16px;
        }

        .title {
            font-size: 18px;
            font-weight: 600;
            color: #e94560;
        }

        button {
            background: #0f3460;
            color: #eee;
            border: 1px solid #16213e;
            padding: 6px 12px;
            cursor: pointer;
        }

        #subscribe {
            height: 1.6em;
            line-height: 1.6em;
            overflow-y: auto;
            white-space: pre-wrap;
            font-family: monospace;
            background: #16213e;
            padding: 4px 8px;
            margin-bottom: 8px;
        }

        .send {
            display: flex;
            gap: 8px;
            margin-bottom: 16px;
        }

        #message {
            flex: 1;
            background: #16213e;
            color: #eee;
            border: 1px solid #0f3460;
            padding: 6px;
        }

        #myResults table {
            border-collapse: collapse;
            width: 100%;
            display: block;
        }

        #myResults th,
        #myResults td {
            border: 1px solid #0f3460;
            padding: 4px 8px;
            text-align: left;
        }

        #myResults a {
            color: #e94560;
        }
    </style>
</head>
<body>
    <div class="header">
        <span class="title">Arena Client</span>
        <span>
            <button id="clear" type="button">Clear results</button>
            <button id="refresh" type="button">Refresh</button>
            <button id="signout" type="button">Sign out</button>
        </span>
    </div>

    <div id="subscribe"></div>
    <div class="send">
        <input id="message" type="text" autocomplete="off">
        <button id="submit" type="button">Send</button>
    </div>

    <div id="myResults"></div>

    <script>
        function apply(element, html, scroll) {
            var el = document.getElementById(element);
            if (!el) {
                return;
            }
            el.innerHTML = html;
            var lineHeight = parseFloat(getComputedStyle(el).lineHeight) || 16;
            el.scrollTop = scroll * lineHeight;
        }

        function post(path, body) {
            return fetch(path, {
                method: "POST",
                headers: { "Content-Type": "application/json" },
                body: body === undefined ? "" : JSON.stringify(body)
            });
        }

        function sendMessage() {
            var input = document.getElementById("message");
            var text = input.value;
            if (text === "") {
                return;
            }
            post("/send", { message: text }).then(function (res) {
                if (res.ok) {
                    input.value = "";
                }
            });
        }

        // Subscribe before the snapshot; pushes received meanwhile are newer
        var pending = [];
        var scheme = window.location.protocol === "https:" ? "wss://" : "ws://";
        var updates = new WebSocket(scheme + window.location.host + "/ws");
        updates.onmessage = function (event) {
            var update = JSON.parse(event.data);
            if (pending !== null) {
                pending.push(update);
                return;
            }
            apply(update.element, update.html, update.scroll);
        };
        updates.onopen = function () {
            fetch("/state")
                .then(function (res) { return res.json(); })
                .then(function (state) {
                    Object.keys(state).forEach(function (id) {
                        apply(id, state[id].html, state[id].scroll);
                    });
                })
                .finally(function () {
                    var queued = pending;
                    pending = null;
                    queued.forEach(function (update) {
                        apply(update.element, update.html, update.scroll);
                    });
                });
        };

        document.getElementById("submit").addEventListener("click", sendMessage);
        document.getElementById("message").addEventListener("keyup", function (e) {
            if (e.key === "Enter") {
                sendMessage();
            }
        });
        document.getElementById("clear").addEventListener("click", function () {
            post("/clear");
        });
        document.getElementById("refresh").addEventListener("click", function () {
            post("/refresh");
        });
        document.getElementById("signout").addEventListener("click", function () {
            window.location.href = "signout";
        });
    </script>
</body>
</html>
"#;
