/// Embedded web assets for the graph viewer

pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Depviz - Dependency Graph</title>
    <script src="https://d3js.org/d3.v7.min.js"></script>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, sans-serif;
            background: #1a1a2e;
            color: #eee;
            overflow: hidden;
        }

        #container {
            display: flex;
            height: 100vh;
        }

        #graph {
            flex: 1;
            background: #16213e;
        }

        body.light #graph {
            background: #f7f7fb;
        }

        #sidebar {
            width: 320px;
            background: #1a1a2e;
            border-left: 1px solid #333;
            padding: 20px;
            overflow-y: auto;
        }

        h1 {
            font-size: 1.4em;
            margin-bottom: 10px;
            color: #00d9ff;
        }

        h2 {
            font-size: 1.1em;
            margin: 15px 0 10px;
            color: #888;
            text-transform: uppercase;
            letter-spacing: 1px;
        }

        .stat {
            display: flex;
            justify-content: space-between;
            padding: 8px 0;
            border-bottom: 1px solid #333;
        }

        .stat-value {
            color: #00d9ff;
            font-weight: bold;
        }

        #node-info {
            display: none;
            margin-top: 20px;
            padding: 15px;
            background: #16213e;
            border-radius: 8px;
        }

        #node-info.visible {
            display: block;
        }

        #node-info h3 {
            color: #00d9ff;
            margin-bottom: 10px;
            word-break: break-all;
        }

        .node-stat {
            display: flex;
            justify-content: space-between;
            padding: 5px 0;
            font-size: 0.9em;
        }

        .filters label {
            display: flex;
            align-items: center;
            gap: 6px;
            font-size: 0.9em;
            padding: 3px 0;
        }

        .legend-color {
            width: 12px;
            height: 12px;
            border-radius: 50%;
            display: inline-block;
        }

        button {
            margin-top: 10px;
            padding: 8px 12px;
            background: #0f3460;
            color: #eee;
            border: 1px solid #00d9ff;
            border-radius: 6px;
            cursor: pointer;
        }
    </style>
</head>
<body>
    <div id="container">
        <svg id="graph"></svg>
        <div id="sidebar">
            <h1>Depviz</h1>
            <div class="stat"><span>Nodes</span><span class="stat-value" id="stat-nodes">0</span></div>
            <div class="stat"><span>Edges</span><span class="stat-value" id="stat-edges">0</span></div>
            <h2>Modules</h2>
            <div class="filters" id="module-filters"></div>
            <button id="reset-filters">Reset filters</button>
            <button id="toggle-theme">Toggle theme</button>
            <div id="node-info">
                <h3 id="info-label"></h3>
                <div class="node-stat"><span>Module</span><span id="info-module"></span></div>
                <div class="node-stat"><span>Archetype</span><span id="info-archetype"></span></div>
                <div class="node-stat"><span>Degree</span><span id="info-degree"></span></div>
            </div>
        </div>
    </div>

    <script>
        const svg = d3.select('#graph');
        let payload = null;

        // Module -> color, extracted from the ordered stylesheet rules.
        function moduleColors() {
            const colors = {};
            for (const rule of payload.stylesheet.rules) {
                const m = rule.selector.match(/^node\[module=(.+)\]$/);
                if (m && rule.props.background) colors[m[1]] = rule.props.background;
            }
            return colors;
        }

        async function load() {
            payload = await (await fetch('/api/graph')).json();
            document.getElementById('stat-nodes').textContent = payload.node_count;
            document.getElementById('stat-edges').textContent = payload.edge_count;
            document.body.className = payload.stylesheet.theme === 'light' ? 'light' : '';
            renderFilters();
            renderGraph();
        }

        function renderFilters() {
            const box = document.getElementById('module-filters');
            box.innerHTML = '';
            const colors = moduleColors();
            for (const module of payload.allowed_modules) {
                const label = document.createElement('label');
                const check = document.createElement('input');
                check.type = 'checkbox';
                check.checked = payload.active_filters.includes(module);
                check.onchange = async () => {
                    await fetch('/api/view/filters/toggle', {
                        method: 'POST',
                        headers: {'Content-Type': 'application/json'},
                        body: JSON.stringify({key: module})
                    });
                    load();
                };
                const swatch = document.createElement('span');
                swatch.className = 'legend-color';
                swatch.style.background = colors[module] || '#bab0ac';
                label.append(check, swatch, module);
                box.append(label);
            }
        }

        function renderGraph() {
            svg.selectAll('*').remove();
            const width = svg.node().clientWidth;
            const height = svg.node().clientHeight;
            const colors = moduleColors();

            const active = new Set(payload.active_filters);
            const nodes = payload.elements.nodes
                .filter(n => active.has(n.module))
                .map(n => Object.assign({}, n, payload.positions[n.id] || {}));
            const ids = new Set(nodes.map(n => n.id));
            const links = payload.elements.edges
                .filter(e => ids.has(e.source) && ids.has(e.target))
                .map(e => Object.assign({}, e));

            const sim = d3.forceSimulation(nodes)
                .force('link', d3.forceLink(links).id(d => d.id).distance(70))
                .force('charge', d3.forceManyBody().strength(-180))
                .force('center', d3.forceCenter(width / 2, height / 2));

            const link = svg.append('g').selectAll('line')
                .data(links).join('line')
                .attr('stroke', d => d.is_inter_module ? '#e07b00' : '#556080')
                .attr('stroke-dasharray', d => d.kind === 'inheritance' ? '6 3' : d.kind === 'usage' ? '2 3' : null);

            const node = svg.append('g').selectAll('circle')
                .data(nodes).join('circle')
                .attr('r', d => 6 + Math.min(d.weight, 8))
                .attr('fill', d => colors[d.module] || '#bab0ac')
                .attr('stroke', d => d.complexity === 'high' ? '#00d9ff' : '#333a56')
                .attr('stroke-width', d => d.complexity === 'high' ? 2.5 : 1)
                .call(d3.drag()
                    .on('drag', (event, d) => { d.fx = event.x; d.fy = event.y; sim.alpha(0.3).restart(); })
                    .on('end', async (event, d) => {
                        await fetch('/api/view/positions', {
                            method: 'POST',
                            headers: {'Content-Type': 'application/json'},
                            body: JSON.stringify({id: d.id, x: d.fx, y: d.fy})
                        });
                    }))
                .on('click', (event, d) => showInfo(d));

            const label = svg.append('g').selectAll('text')
                .data(nodes).join('text')
                .text(d => d.label)
                .attr('font-size', '10px')
                .attr('fill', payload.stylesheet.theme === 'light' ? '#1a1a2e' : '#eee')
                .attr('text-anchor', 'middle');

            sim.on('tick', () => {
                link.attr('x1', d => d.source.x).attr('y1', d => d.source.y)
                    .attr('x2', d => d.target.x).attr('y2', d => d.target.y);
                node.attr('cx', d => d.x).attr('cy', d => d.y);
                label.attr('x', d => d.x).attr('y', d => d.y - 12);
            });
        }

        function showInfo(d) {
            document.getElementById('node-info').classList.add('visible');
            document.getElementById('info-label').textContent = d.full_label;
            document.getElementById('info-module').textContent = d.module;
            document.getElementById('info-archetype').textContent = d.archetype;
            document.getElementById('info-degree').textContent = d.weight;
        }

        document.getElementById('reset-filters').onclick = async () => {
            await fetch('/api/view/filters/reset', {method: 'POST'});
            load();
        };

        document.getElementById('toggle-theme').onclick = async () => {
            await fetch('/api/view/theme', {method: 'POST'});
            load();
        };

        load();
    </script>
</body>
</html>
"#;
