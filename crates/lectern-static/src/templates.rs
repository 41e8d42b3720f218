//! Built-in templates for the `minimal` theme.
//!
//! Each template is a named component. Item components receive `item` and
//! `base_url`; section and page components receive their descriptor fields
//! at the top level.

/// Component name and source for every built-in template.
pub const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    ("base", BASE_TEMPLATE),
    ("seo_head", SEO_HEAD_TEMPLATE),
    ("mathjax", MATHJAX_TEMPLATE),
    ("navbar", NAVBAR_TEMPLATE),
    ("footer", FOOTER_TEMPLATE),
    ("page_layout", PAGE_LAYOUT_TEMPLATE),
    ("search_filter_bar", SEARCH_BAR_TEMPLATE),
    ("landing_page", LANDING_PAGE_TEMPLATE),
    ("profile_hero", PROFILE_HERO_TEMPLATE),
    ("section", SECTION_TEMPLATE),
    ("bio_section", BIO_SECTION_TEMPLATE),
    ("service_section", SERVICE_SECTION_TEMPLATE),
    ("divider", DIVIDER_TEMPLATE),
    ("publication_item", PUBLICATION_ITEM_TEMPLATE),
    ("project_item", PROJECT_ITEM_TEMPLATE),
    ("news_item", NEWS_ITEM_TEMPLATE),
    ("talk_item", TALK_ITEM_TEMPLATE),
    ("blog_post_item", BLOG_POST_ITEM_TEMPLATE),
    ("blog_post_page", BLOG_POST_PAGE_TEMPLATE),
    ("service_item", SERVICE_ITEM_TEMPLATE),
    ("page", PAGE_TEMPLATE),
];

const BASE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{ page_title }}</title>
  {% include "seo_head" %}
  {% include "mathjax" %}
  <link rel="stylesheet" href="{{ file('style.css') }}">
</head>
<body>
  {% include "navbar" %}
  <main class="container">
    {{ content|safe }}
  </main>
  {% include "footer" %}
  <script src="{{ file('theme.js') }}"></script>
</body>
</html>
"#;

const SEO_HEAD_TEMPLATE: &str = r#"<meta name="description" content="{{ meta_description }}">
  <meta name="author" content="{{ author.name }}">
  <meta name="robots" content="{{ seo.robots_meta }}">
  {% if canonical_url %}<link rel="canonical" href="{{ canonical_url }}">
  <meta property="og:url" content="{{ canonical_url }}">{% endif %}
  <meta property="og:title" content="{{ page_title }}">
  <meta property="og:description" content="{{ meta_description }}">
  <meta property="og:type" content="{{ og_type }}">
  <meta property="og:site_name" content="{{ site.title }}">
  {% if og_image %}<meta property="og:image" content="{{ og_image }}">{% endif %}
  <meta name="twitter:card" content="{{ seo.twitter_card_type }}">
  <meta name="twitter:title" content="{{ page_title }}">
  <meta name="twitter:description" content="{{ meta_description }}">
  {% if og_image %}<meta name="twitter:image" content="{{ og_image }}">{% endif %}
  {% if structured_data %}<script type="application/ld+json">
{{ structured_data|safe }}
  </script>{% endif %}
  {% if website_schema %}<script type="application/ld+json">
{{ website_schema|safe }}
  </script>{% endif %}"#;

const MATHJAX_TEMPLATE: &str = r#"{% if mathjax.enabled %}{% if mathjax.version == "2" %}<script type="text/x-mathjax-config">
  MathJax.Hub.Config({
    tex2jax: {
      inlineMath: {{ mathjax.inline_math|tojson }},
      displayMath: {{ mathjax.display_math|tojson }},
      processEscapes: {{ mathjax.process_escapes|tojson }},
      processEnvironments: {{ mathjax.process_environments|tojson }},
      skipTags: {{ mathjax.skip_html_tags|tojson }},
      ignoreClass: {{ mathjax.ignore_html_class|tojson }},
      processClass: {{ mathjax.process_html_class|tojson }}
    },
    TeX: { extensions: [{% for ext in mathjax.extensions %}"{{ ext }}.js"{% if not loop.last %}, {% endif %}{% endfor %}] }
  });
  </script>
  <script src="{{ mathjax.cdn_url or 'https://cdnjs.cloudflare.com/ajax/libs/mathjax/2.7.9/MathJax.js?config=TeX-AMS-MML_HTMLorMML' }}"></script>{% else %}<script>
  window.MathJax = {
    tex: {
      inlineMath: {{ mathjax.inline_math|tojson }},
      displayMath: {{ mathjax.display_math|tojson }},
      processEscapes: {{ mathjax.process_escapes|tojson }},
      processEnvironments: {{ mathjax.process_environments|tojson }},
      packages: {'[+]': {{ mathjax.extensions|tojson }}}
    },
    options: {
      skipHtmlTags: {{ mathjax.skip_html_tags|tojson }},
      ignoreHtmlClass: {{ mathjax.ignore_html_class|tojson }},
      processHtmlClass: {{ mathjax.process_html_class|tojson }}
    }
  };
  </script>
  <script id="MathJax-script" async src="{{ mathjax.cdn_url or 'https://cdn.jsdelivr.net/npm/mathjax@3/es5/tex-mml-chtml.js' }}"></script>{% endif %}{% endif %}"#;

const NAVBAR_TEMPLATE: &str = r#"<nav class="navbar">
    <div class="nav-inner">
      <a class="nav-brand" href="{{ url_for('index.html') }}">{{ author.name }}</a>
      <ul class="nav-links">
        <li><a href="{{ url_for('index.html') }}"{% if current_page == 'index.html' %} class="active"{% endif %}>Home</a></li>
        {% for page in built_pages %}<li><a href="{{ url_for(page.filename) }}"{% if current_page == page.filename %} class="active"{% endif %}>{{ page.label }}</a></li>
        {% endfor %}{% if author.cv_path %}<li><a href="{{ file(author.cv_path) }}" target="_blank" rel="noopener">CV</a></li>{% endif %}
      </ul>
    </div>
  </nav>"#;

const FOOTER_TEMPLATE: &str = r#"<footer class="footer">
    <p>&copy; {{ current_year }} {{ author.name }}</p>
  </footer>"#;

const PAGE_LAYOUT_TEMPLATE: &str = r#"<section class="list-page">
  <h1 class="page-title">{{ title }}</h1>
  {% if has_search %}{% include "search_filter_bar" %}{% endif %}
  {% if grouped_items %}{% for group in grouped_items %}<div class="item-group">
    <h2 class="group-title">{{ group.group_name }}</h2>
    <div class="items {{ layout }}{% if columns > 1 %} grid-{{ columns }}{% endif %}">
      {% for item in group.items %}{{ item.rendered_html|safe }}{% endfor %}
    </div>
  </div>
  {% endfor %}{% else %}<div class="items {{ layout }}{% if columns > 1 %} grid-{{ columns }}{% endif %}">
    {{ items_html|safe }}
  </div>{% endif %}
</section>"#;

const SEARCH_BAR_TEMPLATE: &str = r#"<div class="search-bar">
    <input type="search" id="item-search" placeholder="Search {{ title|lower }}..." aria-label="Search {{ title|lower }}">
  </div>"#;

const LANDING_PAGE_TEMPLATE: &str = r#"{% include "profile_hero" %}
{% for section in sections %}{% if not loop.first %}{% include "divider" %}{% endif %}
{{ section|safe }}
{% endfor %}"#;

const PROFILE_HERO_TEMPLATE: &str = r#"<header class="hero">
  {% if hero.photo %}<img class="hero-photo" src="{{ file(hero.photo) }}" alt="{{ hero.name }}">{% endif %}
  <div class="hero-text">
    <h1>{{ hero.name }}</h1>
    <p class="hero-title">{{ hero.title }}{% if hero.affiliation %}, {{ hero.affiliation }}{% endif %}</p>
    {% if hero.tagline %}<p class="hero-tagline">{{ hero.tagline }}</p>{% endif %}
    {% if hero.email %}<p class="hero-email"><a href="mailto:{{ hero.email }}">{{ hero.email }}</a></p>{% endif %}
    {% if hero.social_links %}<div class="social-links">
      {% for link in hero.social_links %}<a href="{{ link.url }}" target="_blank" rel="noopener">{{ link.label }}</a>
      {% endfor %}
    </div>{% endif %}
    {% if hero.actions %}<div class="hero-actions">
      {% for action in hero.actions %}{% if action.external %}<a class="button button-{{ action.style }}" href="{{ action.url }}" target="_blank" rel="noopener">{{ action.text }}</a>{% else %}<a class="button button-{{ action.style }}" href="{{ url_for(action.url) }}">{{ action.text }}</a>{% endif %}
      {% endfor %}
    </div>{% endif %}
  </div>
</header>"#;

const SECTION_TEMPLATE: &str = r#"<section class="home-section section-{{ layout }}">
  <h2 class="section-title">{{ title }}</h2>
  {% if layout == "bio" %}{% include "bio_section" %}{% elif layout == "service" %}{% include "service_section" %}{% else %}<div class="items {{ layout }}{% if grid_cols %} grid-{{ grid_cols }}{% endif %}">
    {% for item in items %}{{ item.rendered_html|safe }}{% endfor %}
  </div>{% endif %}
  {% if view_all_link %}<a class="view-all" href="{{ url_for(view_all_link) }}">{{ view_all_text or "View all" }} &rarr;</a>{% endif %}
</section>"#;

const BIO_SECTION_TEMPLATE: &str = r#"<div class="bio">{{ content|safe }}</div>
  {% if interests %}<div class="interests">
    <h3>Research Interests</h3>
    <ul>{% for interest in interests %}<li>{{ interest }}</li>{% endfor %}</ul>
  </div>{% endif %}"#;

const SERVICE_SECTION_TEMPLATE: &str = r#"<div class="service">
    {% if items.leadership_items %}<ul class="service-list leadership">
      {% for item in items.leadership_items %}{{ item.rendered_html|safe }}{% endfor %}
    </ul>{% endif %}
    {% for group in items.review_groups %}<div class="service-group">
      <h3>{{ group.name }}</h3>
      <ul class="service-list">{% for item in group.items %}{{ item.rendered_html|safe }}{% endfor %}</ul>
    </div>
    {% endfor %}
  </div>"#;

const DIVIDER_TEMPLATE: &str = r#"<hr class="section-divider">"#;

const PUBLICATION_ITEM_TEMPLATE: &str = r#"<article class="item publication{% if item.highlight %} highlighted{% endif %}" data-search="{{ item.title|lower }} {{ item.venue|lower }}">
  <h3 class="item-title">{{ item.title }}</h3>
  <p class="authors">{{ item.highlighted_authors|safe }}</p>
  <p class="venue"><em>{{ item.venue }}</em>, {{ item.year }}</p>
  {% if item.abstract %}<details class="abstract"><summary>Abstract</summary><p>{{ item.abstract }}</p></details>{% endif %}
  <div class="item-links">
    {% for link in item.links %}<a class="link-button" href="{{ file(link.url) }}" target="_blank" rel="noopener">{{ link.label }}</a>{% endfor %}
    {% if item.bibtex %}<button class="link-button cite-button" type="button" data-bibtex="{{ item.bibtex }}">Cite</button>{% endif %}
  </div>
</article>"#;

const PROJECT_ITEM_TEMPLATE: &str = r#"<article class="item project-card{% if item.highlight %} highlighted{% endif %}" data-search="{{ item.title|lower }}">
  {% if item.image %}<img class="project-image" src="{{ file(item.image) }}" alt="{{ item.title }}">{% endif %}
  <div class="project-body">
    <h3 class="item-title">{{ item.title }}</h3>
    {% if item.category %}<span class="tag">{{ item.category }}</span>{% endif %}
    <div class="item-description">{{ item.description|safe }}</div>
    {% if item.collaborators %}<p class="collaborators">With {{ item.collaborators|join(", ") }}</p>{% endif %}
    <div class="item-links">
      {% for key, label in [["github", "GitHub"], ["paper", "Paper"], ["documentation", "Docs"], ["website", "Website"], ["demo", "Demo"], ["code", "Code"]] %}{% if item[key] %}<a class="link-button" href="{{ file(item[key]) }}" target="_blank" rel="noopener">{{ label }}</a>{% endif %}{% endfor %}
    </div>
  </div>
</article>"#;

const NEWS_ITEM_TEMPLATE: &str = r#"<div class="item news-item{% if item.highlight %} highlighted{% endif %}">
  <span class="news-date">{{ item.date }}</span>
  <div class="news-content">{{ item.content|safe }}</div>
  <div class="item-links">
    {% for key, label in [["paper", "Paper"], ["code", "Code"], ["slides", "Slides"], ["video", "Video"], ["website", "Website"], ["demo", "Demo"], ["release_notes", "Release Notes"], ["documentation", "Docs"], ["tutorial_page", "Tutorial"], ["materials", "Materials"], ["project_page", "Project Page"]] %}{% if item[key] %}<a class="link-button" href="{{ file(item[key]) }}" target="_blank" rel="noopener">{{ label }}</a>{% endif %}{% endfor %}
  </div>
</div>"#;

const TALK_ITEM_TEMPLATE: &str = r#"<div class="item talk" data-search="{{ item.title|lower }} {{ item.venue|lower }}">
  <span class="talk-date">{{ item.date }}</span>
  <div class="talk-body">
    <h3 class="item-title">{{ item.title }}</h3>
    <p class="venue">{% if item.type %}<span class="tag">{{ item.type }}</span> {% endif %}{{ item.venue }}</p>
    {% if item.description %}<div class="item-description">{{ item.description|safe }}</div>{% endif %}
    <div class="item-links">
      {% for key, label in [["slides", "Slides"], ["video", "Video"], ["code", "Code"], ["materials", "Materials"], ["demo", "Demo"]] %}{% if item[key] %}<a class="link-button" href="{{ file(item[key]) }}" target="_blank" rel="noopener">{{ label }}</a>{% endif %}{% endfor %}
    </div>
  </div>
</div>"#;

const BLOG_POST_ITEM_TEMPLATE: &str = r#"<article class="item blog-card" data-search="{{ item.title|lower }}">
  {% if item.image %}<img class="blog-card-image" src="{{ file(item.image) }}" alt="{{ item.title }}">{% endif %}
  <h3 class="item-title"><a href="{{ url_for('blog/' ~ item.slug ~ '.html') }}">{{ item.title }}</a></h3>
  {% if item.date %}<p class="post-date">{{ item.date }}</p>{% endif %}
  {% if item.excerpt %}<div class="excerpt">{{ item.excerpt|safe }}</div>{% endif %}
  {% if item.tags %}<div class="tags">{% for tag in item.tags %}<span class="tag">{{ tag }}</span>{% endfor %}</div>{% endif %}
</article>"#;

const BLOG_POST_PAGE_TEMPLATE: &str = r#"<article class="blog-post">
  <a class="back-link" href="{{ url_for('blog.html') }}">&larr; All posts</a>
  <h1 class="post-title">{{ item.title }}</h1>
  {% if item.date %}<p class="post-date">{{ item.date }}</p>{% endif %}
  {% if item.tags %}<div class="tags">{% for tag in item.tags %}<span class="tag">{{ tag }}</span>{% endfor %}</div>{% endif %}
  {% if item.image %}<img class="post-image" src="{{ file(item.image) }}" alt="{{ item.title }}">{% endif %}
  <div class="post-content">{{ item.content|safe }}</div>
</article>"#;

const SERVICE_ITEM_TEMPLATE: &str = r#"<li class="service-item{% if item.highlight %} highlighted{% endif %}">
        {% if item.url %}<a href="{{ item.url }}" target="_blank" rel="noopener">{{ item.description }}</a>{% else %}{{ item.description }}{% endif %}
        {% if item.subtitle %}<span class="service-subtitle">{{ item.subtitle }}</span>{% endif %}
        {% if item.highlight %}<span class="service-highlight">{{ item.highlight }}</span>{% endif %}
        <span class="service-date">{{ item.date }}</span>
      </li>"#;

const PAGE_TEMPLATE: &str = r#"<article class="page">
  <h1 class="page-title">{{ item.title }}</h1>
  <div class="page-content">{{ item.content|safe }}</div>
</article>"#;
